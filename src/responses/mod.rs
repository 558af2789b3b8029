pub mod download;
pub mod errors;
pub mod html;
pub mod json;

pub use crate::errors::ResultResp;
pub use download::attachment_response;
pub use errors::{html_error_response, json_error_response};
pub use html::{html_response, redirect, redirect_with_cookie};
pub use json::{json_response, ApiEnvelope};
