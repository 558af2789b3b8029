use crate::router::respond;
use crate::tests::utils::{body_json, get, init_test_app};
use crate::errors::ServerError;
use astra::Body;
use http::{Method, Request};
use pretty_assertions::assert_eq;

#[test]
fn all_programs_drops_records_without_a_name() {
    let app = init_test_app();
    let resp = get(&app, "/api/programs", None).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let json = body_json(resp);
    assert_eq!(json["success"], true);
    assert_eq!(json["programs"].as_array().unwrap().len(), 15);
    assert!(json.get("data").is_none());
}

#[test]
fn search_filters_sorts_and_pages() {
    let app = init_test_app();
    let resp = get(
        &app,
        "/api/programs/search?costCategory=FREE&sort=name&dir=asc&pageSize=2",
        None,
    )
    .expect("Failed to handle request");

    let json = body_json(resp);
    let names: Vec<&str> = json["programs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["programName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Girls Who Code Summer Immersion", "MITES Summer"]);
    assert_eq!(
        json["data"],
        serde_json::json!({
            "totalItems": 3,
            "totalPages": 2,
            "pageIndex": 1,
            "pageSize": 2,
            "startIndex": 0,
            "endIndex": 2
        })
    );
}

#[test]
fn search_past_the_last_page_is_empty_not_an_error() {
    let app = init_test_app();
    let json = body_json(get(&app, "/api/programs/search?page=40", None).unwrap());
    assert_eq!(json["success"], true);
    assert!(json["programs"].as_array().unwrap().is_empty());
    assert_eq!(json["data"]["totalPages"], 1);
}

#[test]
fn single_program_by_id() {
    let app = init_test_app();
    let json = body_json(get(&app, "/api/programs/4", None).unwrap());
    assert_eq!(json["data"]["programName"], "Summer Science Program in Astrophysics");
    assert_eq!(json["data"]["organizationWebsite"], "https://summerscience.org");
}

#[test]
fn unknown_program_is_a_404_envelope() {
    let app = init_test_app();
    assert!(matches!(
        get(&app, "/api/programs/999", None),
        Err(ServerError::NotFound)
    ));

    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/programs/999")
        .body(Body::empty())
        .unwrap();
    let resp = respond(req, &app.state);
    assert_eq!(resp.status(), 404);
    assert_eq!(
        body_json(resp),
        serde_json::json!({"success": false, "error": "Not Found"})
    );
}

#[test]
fn filter_options_and_stats() {
    let app = init_test_app();

    let opts = body_json(get(&app, "/api/programs/filters", None).unwrap());
    let costs: Vec<&str> = opts["data"]["costCategories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    assert_eq!(costs.first(), Some(&"FREE"));
    assert_eq!(costs.last(), Some(&"SLIDING_SCALE"));

    let stats = body_json(get(&app, "/api/programs/stats", None).unwrap());
    assert_eq!(stats["data"]["totalPrograms"], 15);
    assert_eq!(stats["data"]["byCostCategory"]["FREE"], 3);
}

#[test]
fn search_filters_by_program_type() {
    let app = init_test_app();
    let resp = get(&app, "/api/programs/search?programType=Workshop&sort=name", None)
        .expect("Failed to handle request");

    let json = body_json(resp);
    let names: Vec<&str> = json["programs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["programName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Stanford Math Circle", "Young Writers Workshop"]);
    assert_eq!(json["data"]["totalItems"], 2);
}
