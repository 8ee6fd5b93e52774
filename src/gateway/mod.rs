use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde_json::{Map, Value};

use crate::{
    config::GatewayConfig,
    gateway::{
        auth::authenticated_headers,
        error::{ErrorResponse, GatewayError},
        exchange::Exchange,
        modification::{CaptureRequest, CaptureResponse},
    },
};

mod auth;
pub mod error;
/// Record of a payment API call, returned to json callers
pub mod exchange;
/// Capture modification request and response bodies
pub mod modification;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Client for the payment API capture modification endpoint.
///
/// Cloning is cheap and clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CaptureGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl CaptureGateway {
    pub fn new(config: GatewayConfig) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    /// Send a capture modification request.
    ///
    /// Only a `200 OK` is treated as success. Any other status is reported as
    /// [`GatewayError::Capture`] with the error body sent by the payment API.
    pub async fn capture(
        &self,
        request: &CaptureRequest,
        exchange: &mut Exchange,
    ) -> Result<CaptureResponse> {
        let url = &self.config.endpoint;
        exchange.sent(url, request);
        tracing::debug!(
            %url,
            original_reference = %request.original_reference,
            currency = %request.modification_amount.currency,
            value = request.modification_amount.value,
            "Gateway API capture request"
        );

        let headers =
            authenticated_headers(&self.config.username, self.config.password.expose_secret());
        let res = self
            .client
            .post(url)
            .json(request)
            .headers(headers)
            .send()
            .await?;
        let status = res.status();
        exchange.status(status);

        let body = res.text().await?;
        let response = match serde_json::from_str::<Map<String, Value>>(&body) {
            Ok(response) => Value::Object(response),
            Err(e) => {
                tracing::warn!(%status, "Gateway API capture response is not a json object: {e}");
                exchange.received_raw(body);
                return Err(e.into());
            }
        };
        tracing::debug!(%status, data = %response, "Gateway API capture response");
        exchange.received_json(response.clone());

        if status != StatusCode::OK {
            // Error fields are read leniently, so any json object yields a capture error
            let response: ErrorResponse = serde_json::from_value(response)?;
            return Err(GatewayError::Capture { status, response });
        }
        Ok(serde_json::from_value(response)?)
    }
}
