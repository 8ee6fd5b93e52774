use reqwest::StatusCode;
use serde::Serialize;

use crate::gateway::{
    error::{ErrorResponse, GatewayError},
    exchange::ExchangeLog,
};

pub mod api;

pub type Result<T> = std::result::Result<T, ConnectErrorResponse>;

#[derive(Debug, Serialize)]
pub struct ConnectErrorResponse {
    result: bool,
    error: String,
    /// Error fields reported by the payment API when it rejected the request
    #[serde(flatten)]
    details: Option<ErrorResponse>,
    logs: Vec<ExchangeLog>,
    #[serde(skip)]
    status: StatusCode,
}

impl std::error::Error for ConnectErrorResponse {}

impl std::fmt::Display for ConnectErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.error)
    }
}

impl ConnectErrorResponse {
    pub fn new(text: String, logs: Vec<ExchangeLog>) -> Self {
        Self {
            result: false,
            error: text,
            details: None,
            logs,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(text: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            ..Self::new(text, Vec::new())
        }
    }

    pub fn from_gateway(error: GatewayError, logs: Vec<ExchangeLog>) -> Self {
        let details = match &error {
            GatewayError::Capture { response, .. } => Some(response.clone()),
            GatewayError::Transport(_) | GatewayError::Parse(_) => None,
        };
        Self {
            details,
            ..Self::new(error.to_string(), logs)
        }
    }
}

impl axum::response::IntoResponse for ConnectErrorResponse {
    fn into_response(self) -> axum::response::Response {
        tracing::debug!(status = %self.status, error = %self.error, "Connect API error response payload");
        (self.status, axum::Json(self)).into_response()
    }
}
