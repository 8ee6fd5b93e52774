use crate::gateway::{CaptureGateway, modification::CaptureRequest};

#[derive(Debug, Clone, axum::extract::FromRef)]
pub struct AppState {
    pub gate: CaptureGateway,
    pub demo_request: Option<CaptureRequest>,
}

impl AppState {
    pub fn new(gate: CaptureGateway, demo_request: Option<CaptureRequest>) -> Self {
        Self { gate, demo_request }
    }
}
