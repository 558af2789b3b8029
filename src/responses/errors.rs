use crate::errors::ServerError;
use crate::responses::json::ApiEnvelope;
use crate::templates::components::error_page;
use astra::{Body, Response, ResponseBuilder};

/// Message shown to clients. Internal details stay in the log.
fn public_message(err: &ServerError) -> String {
    match err {
        ServerError::NotFound => "Not Found".to_string(),
        ServerError::BadRequest(msg)
        | ServerError::Unauthorized(msg)
        | ServerError::Forbidden(msg) => msg.clone(),
        ServerError::Upstream(_) => "Program source unavailable".to_string(),
        _ => "Internal Server Error".to_string(),
    }
}

fn log_error(err: &ServerError) {
    if err.status_code() >= 500 {
        log::error!("{err}");
    } else {
        log::debug!("{err}");
    }
}

/// Convert a ServerError into a proper HTML response page
pub fn html_error_response(err: ServerError) -> Response {
    log_error(&err);
    let status = err.status_code();
    let html = error_page(status, &public_message(&err)).into_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(html))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}

pub fn json_error_response(err: ServerError) -> Response {
    log_error(&err);
    let status = err.status_code();
    let body = serde_json::to_string(&ApiEnvelope::error(public_message(&err)))
        .unwrap_or_else(|_| r#"{"success":false}"#.to_string());

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
