use serde::{Deserialize, Serialize};

/// Capture modification request for a previously authorised payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRequest {
    /// Merchant account that processed the authorisation
    pub merchant_account: String,
    /// `pspReference` assigned to the authorisation
    pub original_reference: String,
    /// Caller reference or description of this modification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub modification_amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// Three character ISO currency code, must match the authorisation
    pub currency: String,
    /// Amount in minor units. Must not exceed the authorised amount, which is checked by the
    /// payment API
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResponse {
    /// New reference identifying this modification
    pub psp_reference: String,
    /// Acknowledgement token, e.g. `[capture-received]`
    pub response: String,
}

impl CaptureResponse {
    pub const RECEIVED: &str = "[capture-received]";

    /// Capture was accepted for processing. The final result arrives later as a `CAPTURE`
    /// notification.
    pub fn is_received(&self) -> bool {
        self.response == Self::RECEIVED
    }
}
