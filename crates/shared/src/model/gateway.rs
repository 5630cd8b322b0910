use crate::model::{amount::Amount, payment::PaymentStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Outcome of a successful `prepare` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareResult {
    pub tid: String,
    pub redirect_url: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveResult {
    pub tid: String,
    pub approved_at: NaiveDateTime,
    pub amount: Amount,
    pub payment_method_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelResult {
    pub tid: String,
    pub status: PaymentStatus,
    /// Amount canceled by this request.
    pub approved_cancel_amount: Amount,
    /// Cumulative amount canceled as reported by the provider.
    pub canceled_amount: Amount,
    /// Amount still cancelable as reported by the provider.
    pub cancel_available_amount: Amount,
    pub canceled_at: NaiveDateTime,
}
