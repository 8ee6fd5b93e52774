use axum::{
    extract::{FromRequest, State},
    response::IntoResponse,
    routing::get,
};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::instrument;

use crate::{
    connect::{ConnectErrorResponse, Result},
    gateway::{
        CaptureGateway,
        error::GatewayError,
        exchange::{Exchange, ExchangeLog},
        modification::{CaptureRequest, CaptureResponse},
    },
    state::AppState,
};

/// Capture a caller supplied authorisation
#[instrument(skip_all)]
pub async fn capture(
    State(gate): State<CaptureGateway>,
    Json(request): Json<CaptureRequest>,
) -> Result<ConnectResponse<CaptureResponse>> {
    let mut exchange = Exchange::capture();
    tracing::debug!(
        merchant_account = %request.merchant_account,
        original_reference = %request.original_reference,
        "Connect API capture request"
    );
    match gate.capture(&request, &mut exchange).await {
        Ok(res) => {
            let log = exchange.finish();
            if !res.is_received() {
                tracing::warn!(response = %res.response, "Unexpected capture acknowledgement");
            }
            tracing::info!(psp_reference = %res.psp_reference, "Submitted capture");
            Ok(ConnectResponse::new(res, vec![log]))
        }
        Err(e) => {
            tracing::error!("Failed to capture payment: {e}");
            let log = exchange.finish();
            Err(ConnectErrorResponse::from_gateway(e, vec![log]))
        }
    }
}

/// Capture the configured authorisation and describe the outcome in plain text
#[instrument(skip_all)]
pub async fn capture_text(
    State(AppState { gate, demo_request }): State<AppState>,
) -> std::result::Result<String, PlainTextError> {
    let Some(demo_request) = demo_request else {
        tracing::warn!("Plain text capture requested without a configured capture");
        return Err(PlainTextError::NotConfigured);
    };
    let res = gate
        .capture(&demo_request, &mut Exchange::capture())
        .await
        .map_err(|e| {
            tracing::error!("Failed to capture payment: {e}");
            PlainTextError::Gateway(e)
        })?;
    tracing::info!(psp_reference = %res.psp_reference, "Submitted capture");
    Ok(modification_result(&res))
}

pub fn modification_result(res: &CaptureResponse) -> String {
    format!(
        "Modification Result:\n- pspReference: {}\n- response: {}\n",
        res.psp_reference, res.response
    )
}

/// Failure rendered as a plain text `500`
#[derive(Debug)]
pub enum PlainTextError {
    /// `MERCHANT_ACCOUNT` and `ORIGINAL_REFERENCE` are not set
    NotConfigured,
    Gateway(GatewayError),
}

impl IntoResponse for PlainTextError {
    fn into_response(self) -> axum::response::Response {
        let text = match self {
            PlainTextError::NotConfigured => "no capture is configured".to_string(),
            PlainTextError::Gateway(e) => e.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, text).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ConnectResponse<T> {
    result: bool,
    logs: Vec<ExchangeLog>,
    #[serde(flatten)]
    data: T,
}

impl<T> ConnectResponse<T> {
    pub fn new(data: T, logs: Vec<ExchangeLog>) -> Self {
        Self {
            result: true,
            logs,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ConnectResponse<T> {
    fn into_response(self) -> axum::response::Response {
        tracing::debug!(result = self.result, logs = self.logs.len(), "Connect API response payload");
        axum::Json(self).into_response()
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/modifications/capture", get(capture_text).post(capture))
}

/// `Json` extractor wrapper that customizes the error from `axum::extract::Json`
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: serde::de::DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ConnectErrorResponse;

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(e) => Err(ConnectErrorResponse::bad_request(e.body_text())),
        }
    }
}
