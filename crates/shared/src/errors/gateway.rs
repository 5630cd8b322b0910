use thiserror::Error;

/// Failures raised by the payment provider client.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network failure or timeout; the provider may never have seen the call.
    #[error("Payment gateway unavailable: {0}")]
    Unavailable(String),

    #[error("Payment gateway rejected the request ({code}): {message}")]
    Rejected { code: i32, message: String },

    #[error("Payment {0} is already approved")]
    AlreadyApproved(String),

    #[error("Cancel amount {requested} exceeds cancelable amount {available}")]
    ExcessiveCancelAmount { requested: i64, available: i64 },

    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::InvalidResponse(err.to_string())
        } else {
            GatewayError::Unavailable(err.to_string())
        }
    }
}
