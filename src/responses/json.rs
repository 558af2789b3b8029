// responses/json.rs
use crate::domain::Program;
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use serde::Serialize;
use serde_json::Value;

/// `{ success, programs?, data?, error? }`, the shape every `/api` route answers with.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<'a> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programs: Option<Vec<&'a Program>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> ApiEnvelope<'a> {
    pub fn programs(programs: Vec<&'a Program>) -> Self {
        Self {
            success: true,
            programs: Some(programs),
            data: None,
            error: None,
        }
    }

    pub fn data<T: Serialize>(data: &T) -> Result<Self, ServerError> {
        Ok(Self {
            success: true,
            programs: None,
            data: Some(to_value(data)?),
            error: None,
        })
    }

    pub fn with_data<T: Serialize>(mut self, data: &T) -> Result<Self, ServerError> {
        self.data = Some(to_value(data)?);
        Ok(self)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            programs: None,
            data: None,
            error: Some(message.into()),
        }
    }
}

fn to_value<T: Serialize>(data: &T) -> Result<Value, ServerError> {
    serde_json::to_value(data).map_err(|e| ServerError::ExportError(format!("JSON encode failed: {e}")))
}

pub fn json_response<T: Serialize>(status: u16, body: &T) -> ResultResp {
    let json = serde_json::to_string(body)
        .map_err(|e| ServerError::ExportError(format!("JSON encode failed: {e}")))?;

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(json))
        .map_err(|_| ServerError::InternalError)
}
