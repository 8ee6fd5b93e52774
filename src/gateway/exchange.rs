use std::time::Instant;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::gateway::modification::CaptureRequest;

const GATEWAY: &str = "adyen";

/// Payment API operation an exchange was made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Capture,
}

/// Reply of the payment API as it was received
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "format", content = "body")]
pub enum ReceivedBody {
    Json(Value),
    /// Body that is not a json object, kept verbatim
    Raw(String),
}

/// What was sent to and received from the payment API during one call
#[derive(Debug, Serialize)]
pub struct ExchangeLog {
    gateway: &'static str,
    operation: Operation,
    endpoint: Option<String>,
    request: Option<CaptureRequest>,
    status: Option<u16>,
    received: Option<ReceivedBody>,
    #[serde(with = "time::serde::rfc3339")]
    started_at: OffsetDateTime,
    elapsed_ms: u64,
}

/// Recorder handed to the gateway while a call is in flight.
///
/// Credentials are never recorded, only the request body.
#[derive(Debug)]
pub struct Exchange {
    operation: Operation,
    started: Instant,
    started_at: OffsetDateTime,
    endpoint: Option<String>,
    request: Option<CaptureRequest>,
    status: Option<StatusCode>,
    received: Option<ReceivedBody>,
}

impl Exchange {
    pub fn capture() -> Self {
        Self {
            operation: Operation::Capture,
            started: Instant::now(),
            started_at: OffsetDateTime::now_utc(),
            endpoint: None,
            request: None,
            status: None,
            received: None,
        }
    }

    pub fn sent(&mut self, endpoint: &str, request: &CaptureRequest) {
        self.endpoint = Some(endpoint.to_owned());
        self.request = Some(request.clone());
    }

    pub fn status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    pub fn received_json(&mut self, body: Value) {
        self.received = Some(ReceivedBody::Json(body));
    }

    pub fn received_raw(&mut self, body: String) {
        self.received = Some(ReceivedBody::Raw(body));
    }

    pub fn finish(self) -> ExchangeLog {
        let elapsed_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        ExchangeLog {
            gateway: GATEWAY,
            operation: self.operation,
            endpoint: self.endpoint,
            request: self.request,
            status: self.status.map(|s| s.as_u16()),
            received: self.received,
            started_at: self.started_at,
            elapsed_ms,
        }
    }
}
