use crate::tests::utils::{body_string, get, init_test_app};

#[test]
fn listing_page_loads_successfully() {
    let app = init_test_app();
    let resp = get(&app, "/", None).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Summer Programs"));
    assert!(body.contains("Showing 1–15 of 15 programs"));
    assert!(body.contains("Boston University PROMYS"));
    assert!(body.contains("Login"));
}

#[test]
fn listing_applies_query_filters() {
    let app = init_test_app();
    let body = body_string(get(&app, "/?costCategory=FREE&state=MA", None).unwrap());
    assert!(body.contains("Showing 1–2 of 2 programs"));
    assert!(body.contains("MITES Summer"));
    assert!(body.contains("Research Science Institute"));
    assert!(!body.contains("Girls Who Code"));
}

#[test]
fn out_of_range_page_is_clamped() {
    let app = init_test_app();
    let body = body_string(get(&app, "/?page=99&pageSize=10", None).unwrap());
    assert!(body.contains("Page 2 of 2"));
    assert!(body.contains("Showing 11–15 of 15 programs"));
}

#[test]
fn no_matches_renders_empty_state() {
    let app = init_test_app();
    let body = body_string(get(&app, "/?search=underwater+basket+weaving", None).unwrap());
    assert!(body.contains("No programs match these filters."));
}

#[test]
fn unknown_route_is_not_found() {
    let app = init_test_app();
    assert!(matches!(
        get(&app, "/nope", None),
        Err(crate::errors::ServerError::NotFound)
    ));
}
