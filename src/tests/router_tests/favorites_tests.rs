use crate::errors::ServerError;
use crate::tests::utils::{body_json, body_string, get, header, init_test_app, post_form, sign_in};

#[test]
fn anonymous_visitors_are_sent_to_login() {
    let app = init_test_app();
    let resp = post_form(&app, "/favorites/1", "next=%2F", None).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location"), "/login");

    assert!(matches!(
        get(&app, "/api/favorites", None),
        Err(ServerError::Unauthorized(_))
    ));
}

#[test]
fn toggling_adds_then_removes() {
    let app = init_test_app();
    let token = sign_in(&app, "fan@example.com");

    let resp = post_form(&app, "/favorites/9", "next=%2F%3Fpage%3D1", Some(&token)).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location"), "/?page=1");

    let json = body_json(get(&app, "/api/favorites", Some(&token)).unwrap());
    let saved = json["programs"].as_array().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["programName"], "MITES Summer");

    let page = body_string(get(&app, "/favorites", Some(&token)).unwrap());
    assert!(page.contains("MITES Summer"));
    assert!(page.contains("/export/csv?ids=9"));

    post_form(&app, "/favorites/9", "", Some(&token)).unwrap();
    let json = body_json(get(&app, "/api/favorites", Some(&token)).unwrap());
    assert!(json["programs"].as_array().unwrap().is_empty());
}

#[test]
fn favorites_are_per_user() {
    let app = init_test_app();
    let alice = sign_in(&app, "alice@example.com");
    let bob = sign_in(&app, "bob@example.com");

    post_form(&app, "/favorites/1", "", Some(&alice)).unwrap();

    let json = body_json(get(&app, "/api/favorites", Some(&bob)).unwrap());
    assert!(json["programs"].as_array().unwrap().is_empty());
}

#[test]
fn unknown_program_cannot_be_favorited() {
    let app = init_test_app();
    let token = sign_in(&app, "fan@example.com");
    assert!(matches!(
        post_form(&app, "/favorites/424242", "", Some(&token)),
        Err(ServerError::NotFound)
    ));
}
