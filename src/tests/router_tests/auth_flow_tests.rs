use crate::errors::ServerError;
use crate::router::now_unix;
use crate::tests::utils::{body_string, get, header, init_test_app, post_form, sign_in};

#[test]
fn login_page_loads_successfully() {
    let app = init_test_app();
    let resp = get(&app, "/login", None).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Sign in"));
    assert!(body.contains("form"));
}

#[test]
fn request_link_shows_check_email() {
    let app = init_test_app();
    let resp = post_form(&app, "/auth/request-link", "email=Test%40Example.com", None)
        .expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Check your email"));
    assert!(body.contains("test@example.com"));
}

#[test]
fn request_link_rejects_bad_email() {
    let app = init_test_app();
    assert!(matches!(
        post_form(&app, "/auth/request-link", "email=nope", None),
        Err(ServerError::BadRequest(_))
    ));
}

#[test]
fn magic_link_signs_in_once() {
    let app = init_test_app();
    let issued = app
        .state
        .db
        .with_conn(|conn| app.state.magic.request_link(conn, "c@d.com", now_unix()))
        .unwrap();

    let uri = format!("/auth/magic?token={}", issued.token);
    let resp = get(&app, &uri, None).expect("Failed to handle request");
    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location"), "/");
    assert!(header(&resp, "Set-Cookie").starts_with("session="));

    assert!(matches!(
        get(&app, &uri, None),
        Err(ServerError::Unauthorized(_))
    ));
}

#[test]
fn signed_in_layout_shows_email() {
    let app = init_test_app();
    let token = sign_in(&app, "reader@example.com");
    let body = body_string(get(&app, "/", Some(&token)).unwrap());
    assert!(body.contains("reader@example.com"));
    assert!(body.contains("Log out"));
}

#[test]
fn logout_revokes_session() {
    let app = init_test_app();
    let token = sign_in(&app, "bye@example.com");

    let resp = post_form(&app, "/logout", "", Some(&token)).unwrap();
    assert_eq!(resp.status(), 303);
    assert!(header(&resp, "Set-Cookie").contains("Max-Age=0"));

    assert!(matches!(
        get(&app, "/api/favorites", Some(&token)),
        Err(ServerError::Unauthorized(_))
    ));
}
