use crate::db::suggestions::{get_suggestion, SuggestionStatus};
use crate::errors::ServerError;
use crate::tests::utils::{body_string, get, header, init_test_app, post_form, sign_in, ADMIN_EMAIL};
use rusqlite::params;

fn submit(app: &crate::tests::utils::TestApp, session: Option<&str>) {
    let resp = post_form(
        app,
        "/suggest",
        "program_name=Coastal+Ecology+Lab&organization_name=Bay+Institute&cost_category=FREE&location_state=CA",
        session,
    )
    .expect("Failed to handle request");
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Coastal Ecology Lab"));
}

fn first_suggestion_id(app: &crate::tests::utils::TestApp) -> i64 {
    app.state
        .db
        .with_conn(|conn| {
            conn.query_row("select id from suggestions order by id limit 1", [], |r| r.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap()
}

#[test]
fn suggestion_form_requires_names() {
    let app = init_test_app();
    let resp = post_form(&app, "/suggest", "program_name=&organization_name=X", None).unwrap();
    assert!(body_string(resp).contains("program name is required"));
}

#[test]
fn non_admins_are_forbidden() {
    let app = init_test_app();
    submit(&app, None);
    let token = sign_in(&app, "visitor@example.com");

    assert!(matches!(
        get(&app, "/admin", Some(&token)),
        Err(ServerError::Forbidden(_))
    ));

    let id = first_suggestion_id(&app);
    let uri = format!("/admin/suggestions/{id}/approve");
    let err = post_form(&app, &uri, "", Some(&token)).unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[test]
fn admin_queue_lists_pending_suggestions() {
    let app = init_test_app();
    let submitter = sign_in(&app, "helper@example.com");
    submit(&app, Some(&submitter));

    let admin = sign_in(&app, ADMIN_EMAIL);
    let body = body_string(get(&app, "/admin", Some(&admin)).unwrap());
    assert!(body.contains("Pending suggestions (1)"));
    assert!(body.contains("Coastal Ecology Lab"));
    assert!(body.contains("helper@example.com"));
}

#[test]
fn approving_publishes_a_program() {
    let app = init_test_app();
    submit(&app, None);
    let admin = sign_in(&app, ADMIN_EMAIL);
    let id = first_suggestion_id(&app);

    let resp = post_form(&app, &format!("/admin/suggestions/{id}/approve"), "", Some(&admin)).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location"), "/admin");

    let (suggestion, published) = app
        .state
        .db
        .with_conn(|conn| {
            let s = get_suggestion(conn, id)?.ok_or(ServerError::NotFound)?;
            let n: i64 = conn
                .query_row(
                    "select count(*) from programs where program_name = ?",
                    params!["Coastal Ecology Lab"],
                    |r| r.get(0),
                )
                .map_err(|e| ServerError::DbError(e.to_string()))?;
            Ok((s, n))
        })
        .unwrap();
    assert_eq!(suggestion.status, SuggestionStatus::Approved);
    assert_eq!(published, 1);

    // A second decision on the same suggestion is refused.
    assert!(matches!(
        post_form(&app, &format!("/admin/suggestions/{id}/reject"), "", Some(&admin)),
        Err(ServerError::BadRequest(_))
    ));
}

#[test]
fn rejecting_only_flips_status() {
    let app = init_test_app();
    submit(&app, None);
    let admin = sign_in(&app, ADMIN_EMAIL);
    let id = first_suggestion_id(&app);

    post_form(&app, &format!("/admin/suggestions/{id}/reject"), "", Some(&admin)).unwrap();

    let (status, programs) = app
        .state
        .db
        .with_conn(|conn| {
            let s = get_suggestion(conn, id)?.ok_or(ServerError::NotFound)?;
            let n: i64 = conn
                .query_row("select count(*) from programs", [], |r| r.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))?;
            Ok((s.status, n))
        })
        .unwrap();
    assert_eq!(status, SuggestionStatus::Rejected);
    assert_eq!(programs, 0);
}

#[test]
fn unknown_action_or_bad_id() {
    let app = init_test_app();
    let admin = sign_in(&app, ADMIN_EMAIL);
    assert!(matches!(
        post_form(&app, "/admin/suggestions/abc/approve", "", Some(&admin)),
        Err(ServerError::BadRequest(_))
    ));
    assert!(matches!(
        post_form(&app, "/admin/suggestions/1/archive", "", Some(&admin)),
        Err(ServerError::NotFound)
    ));
}
