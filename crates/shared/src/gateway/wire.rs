//! Kakao Pay request and response bodies.

use crate::{
    errors::{GatewayError, ServiceError},
    model::{
        amount::Amount,
        gateway::{ApproveResult, CancelResult, PrepareResult},
        payment::PaymentStatus,
    },
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Provider code for approving a `tid` twice.
pub const ALREADY_APPROVED_CODE: i32 = -702;

#[derive(Debug, Serialize)]
pub struct ReadyBody<'a> {
    pub cid: &'a str,
    pub partner_order_id: &'a str,
    pub partner_user_id: &'a str,
    pub item_name: &'a str,
    pub quantity: i32,
    pub total_amount: i64,
    pub tax_free_amount: i64,
    pub approval_url: String,
    pub cancel_url: String,
    pub fail_url: String,
}

#[derive(Debug, Serialize)]
pub struct ApproveBody<'a> {
    pub cid: &'a str,
    pub tid: &'a str,
    pub partner_order_id: &'a str,
    pub partner_user_id: &'a str,
    pub pg_token: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CancelBody<'a> {
    pub cid: &'a str,
    pub tid: &'a str,
    pub cancel_amount: i64,
    pub cancel_tax_free_amount: i64,
    pub cancel_available_amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReadyResponse {
    pub tid: String,
    #[serde(default)]
    pub next_redirect_pc_url: Option<String>,
    #[serde(default)]
    pub next_redirect_mobile_url: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ApproveResponse {
    pub tid: String,
    pub payment_method_type: String,
    pub amount: Amount,
    pub approved_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct CancelResponse {
    pub tid: String,
    pub status: String,
    pub approved_cancel_amount: Amount,
    pub canceled_amount: Amount,
    pub cancel_available_amount: Amount,
    pub canceled_at: NaiveDateTime,
}

/// Error body returned with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderError {
    pub error_code: i32,
    pub error_message: String,
}

impl ProviderError {
    pub fn into_gateway_error(self, tid: Option<&str>) -> GatewayError {
        if self.error_code == ALREADY_APPROVED_CODE {
            return GatewayError::AlreadyApproved(tid.unwrap_or_default().to_string());
        }
        GatewayError::Rejected {
            code: self.error_code,
            message: self.error_message,
        }
    }
}

fn checked_amount(field: &str, amount: Amount) -> Result<Amount, GatewayError> {
    amount.validated().map_err(|e| match e {
        ServiceError::Validation(errors) => {
            GatewayError::InvalidResponse(format!("{field}: {}", errors.join(", ")))
        }
        other => GatewayError::InvalidResponse(format!("{field}: {other}")),
    })
}

fn require_tid(tid: String) -> Result<String, GatewayError> {
    if tid.trim().is_empty() {
        return Err(GatewayError::InvalidResponse("tid is empty".into()));
    }
    Ok(tid)
}

impl TryFrom<ReadyResponse> for PrepareResult {
    type Error = GatewayError;

    fn try_from(value: ReadyResponse) -> Result<Self, Self::Error> {
        let redirect_url = value
            .next_redirect_pc_url
            .or(value.next_redirect_mobile_url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| GatewayError::InvalidResponse("missing redirect url".into()))?;

        Ok(PrepareResult {
            tid: require_tid(value.tid)?,
            redirect_url,
            created_at: value.created_at,
        })
    }
}

impl TryFrom<ApproveResponse> for ApproveResult {
    type Error = GatewayError;

    fn try_from(value: ApproveResponse) -> Result<Self, Self::Error> {
        Ok(ApproveResult {
            tid: require_tid(value.tid)?,
            approved_at: value.approved_at,
            amount: checked_amount("amount", value.amount)?,
            payment_method_type: value.payment_method_type,
        })
    }
}

impl TryFrom<CancelResponse> for CancelResult {
    type Error = GatewayError;

    fn try_from(value: CancelResponse) -> Result<Self, Self::Error> {
        let status = PaymentStatus::from_provider(&value.status).ok_or_else(|| {
            GatewayError::InvalidResponse(format!("unknown payment status {}", value.status))
        })?;

        Ok(CancelResult {
            tid: require_tid(value.tid)?,
            status,
            approved_cancel_amount: checked_amount(
                "approved_cancel_amount",
                value.approved_cancel_amount,
            )?,
            canceled_amount: checked_amount("canceled_amount", value.canceled_amount)?,
            cancel_available_amount: checked_amount(
                "cancel_available_amount",
                value.cancel_available_amount,
            )?,
            canceled_at: value.canceled_at,
        })
    }
}
