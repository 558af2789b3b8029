use crate::config::Config;
use crate::db::connection::{init_db, Database};
use crate::repository::FixtureProgramRepository;
use crate::router::{handle, now_unix, AppState};
use astra::{Body, Response};
use http::{Method, Request};
use std::io::Read;
use tempfile::TempDir;

pub const ADMIN_EMAIL: &str = "mod@example.com";

/// An app wired to a throwaway SQLite file and the bundled fixture.
pub struct TestApp {
    pub state: AppState,
    _dir: TempDir,
}

pub fn init_test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = Database::new(dir.path().join("test.sqlite"));
    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    let config = Config {
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        ..Config::default()
    };
    let repo = Box::new(FixtureProgramRepository::new("data/programs.json"));

    TestApp {
        state: AppState::new(config, db, repo),
        _dir: dir,
    }
}

pub fn get(app: &TestApp, uri: &str, session: Option<&str>) -> Result<Response, crate::errors::ServerError> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = session {
        builder = builder.header("Cookie", format!("session={token}"));
    }
    handle(builder.body(Body::empty()).unwrap(), &app.state)
}

pub fn post_form(
    app: &TestApp,
    uri: &str,
    form: &str,
    session: Option<&str>,
) -> Result<Response, crate::errors::ServerError> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(token) = session {
        builder = builder.header("Cookie", format!("session={token}"));
    }
    handle(
        builder.body(Body::from(form.as_bytes().to_vec())).unwrap(),
        &app.state,
    )
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_json(resp: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(resp)).expect("response is JSON")
}

pub fn header<'a>(resp: &'a Response, name: &str) -> &'a str {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Issues a magic link and redeems it through the router. Returns the session token.
pub fn sign_in(app: &TestApp, email: &str) -> String {
    let issued = app
        .state
        .db
        .with_conn(|conn| app.state.magic.request_link(conn, email, now_unix()))
        .expect("request link");

    let resp = get(app, &format!("/auth/magic?token={}", issued.token), None).expect("redeem");
    assert_eq!(resp.status(), 303);

    let cookie = header(&resp, "Set-Cookie");
    cookie
        .strip_prefix("session=")
        .and_then(|rest| rest.split(';').next())
        .expect("session cookie")
        .to_string()
}
