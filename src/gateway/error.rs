use std::fmt::Display;

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Error body returned by the payment API together with a non 200 status.
///
/// Every field is read leniently: any json object decodes, whatever the field types are.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(
        default,
        deserialize_with = "lenient_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<u16>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub error_type: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub error_code: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: String,
    #[serde(
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub psp_reference: Option<String>,
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Strings are kept as is, null becomes empty and anything else its json text
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(|v| value_text(v).unwrap_or_default())
}

fn lenient_optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Value::deserialize(deserializer).map(value_text)
}

/// Accepts `422` and `"422"`, anything else is treated as absent
fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u16>, D::Error> {
    let status = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(status)
}

impl Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.error_type, self.error_code, self.message)
    }
}

#[derive(Debug)]
pub enum GatewayError {
    /// Request never produced a response (dns, connection, tls, timeout)
    Transport(reqwest::Error),
    /// Payment API rejected the request
    Capture {
        status: StatusCode,
        response: ErrorResponse,
    },
    /// Response body is not the expected json
    Parse(serde_json::Error),
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::Transport(e) => Some(e),
            GatewayError::Parse(e) => Some(e),
            GatewayError::Capture { .. } => None,
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::Transport(e) => write!(f, "http request error: {e}"),
            GatewayError::Capture { response, .. } => write!(f, "{response}"),
            GatewayError::Parse(e) => write!(f, "gateway response deserialization: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_fields_render_empty() {
        let response: ErrorResponse =
            serde_json::from_value(json!({ "errorCode": "101", "message": null })).unwrap();
        assert_eq!(response.error_type, "");
        assert_eq!(response.error_code, "101");
        assert_eq!(response.message, "");
        assert_eq!(response.status, None);
    }

    #[test]
    fn non_string_fields_keep_their_json_text() {
        let response: ErrorResponse = serde_json::from_value(json!({
            "errorType": "validation",
            "errorCode": 101,
            "message": ["Invalid", "amount"]
        }))
        .unwrap();
        assert_eq!(response.error_code, "101");
        assert_eq!(response.message, r#"["Invalid","amount"]"#);
        assert_eq!(response.to_string(), r#"validation 101 ["Invalid","amount"]"#);
    }

    #[test]
    fn status_and_psp_reference_are_lenient() {
        let response: ErrorResponse = serde_json::from_value(json!({
            "status": "403",
            "errorType": "security",
            "errorCode": "901",
            "message": "Invalid Merchant Account",
            "pspReference": 8814689190961342u64
        }))
        .unwrap();
        assert_eq!(response.status, Some(403));
        assert_eq!(response.psp_reference.as_deref(), Some("8814689190961342"));

        let response: ErrorResponse =
            serde_json::from_value(json!({ "status": 70000, "pspReference": null })).unwrap();
        assert_eq!(response.status, None);
        assert_eq!(response.psp_reference, None);

        let response: ErrorResponse =
            serde_json::from_value(json!({ "status": { "code": 403 } })).unwrap();
        assert_eq!(response.status, None);
    }

    #[test]
    fn capture_error_display() {
        let err = GatewayError::Capture {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            response: ErrorResponse {
                status: Some(422),
                error_type: "validation".into(),
                error_code: "101".into(),
                message: "Invalid amount".into(),
                psp_reference: None,
            },
        };
        assert_eq!(err.to_string(), "validation 101 Invalid amount");
    }
}
