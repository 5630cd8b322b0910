use crate::model::amount::Amount;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Ready,
    Sent,
    Opened,
    MethodSelected,
    AuthPending,
    AuthDone,
    SidIssued,
    Approved,
    PartiallyCanceled,
    Canceled,
    AuthFailed,
    Quit,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Ready => "READY",
            PaymentStatus::Sent => "SENT",
            PaymentStatus::Opened => "OPENED",
            PaymentStatus::MethodSelected => "METHOD_SELECTED",
            PaymentStatus::AuthPending => "AUTH_PENDING",
            PaymentStatus::AuthDone => "AUTH_DONE",
            PaymentStatus::SidIssued => "SID_ISSUED",
            PaymentStatus::Approved => "APPROVED",
            PaymentStatus::PartiallyCanceled => "PARTIALLY_CANCELED",
            PaymentStatus::Canceled => "CANCELED",
            PaymentStatus::AuthFailed => "AUTH_FAILED",
            PaymentStatus::Quit => "QUIT",
            PaymentStatus::Failed => "FAILED",
        }
    }

    /// Maps the status codes reported by the payment provider.
    pub fn from_provider(code: &str) -> Option<Self> {
        let status = match code {
            "READY" => PaymentStatus::Ready,
            "SEND_TMS" => PaymentStatus::Sent,
            "OPEN_PAYMENT" => PaymentStatus::Opened,
            "SELECT_METHOD" => PaymentStatus::MethodSelected,
            "ARS_WAITING" | "ARS_WAITING_ARS" => PaymentStatus::AuthPending,
            "AUTH_PASSWORD" => PaymentStatus::AuthDone,
            "ISSUED_SID" => PaymentStatus::SidIssued,
            "SUCCESS_PAYMENT" => PaymentStatus::Approved,
            "PART_CANCEL_PAYMENT" => PaymentStatus::PartiallyCanceled,
            "CANCEL_PAYMENT" => PaymentStatus::Canceled,
            "FAIL_AUTH_PASSWORD" => PaymentStatus::AuthFailed,
            "QUIT_PAYMENT" => PaymentStatus::Quit,
            "FAIL_PAYMENT" => PaymentStatus::Failed,
            _ => return None,
        };
        Some(status)
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Canceled | PaymentStatus::Failed | PaymentStatus::Quit
        )
    }

    /// Statuses the provider reports while checkout is still in progress.
    pub fn is_in_checkout(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Ready
                | PaymentStatus::Sent
                | PaymentStatus::Opened
                | PaymentStatus::MethodSelected
                | PaymentStatus::AuthPending
                | PaymentStatus::AuthDone
                | PaymentStatus::SidIssued
        )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s {
            "READY" => PaymentStatus::Ready,
            "SENT" => PaymentStatus::Sent,
            "OPENED" => PaymentStatus::Opened,
            "METHOD_SELECTED" => PaymentStatus::MethodSelected,
            "AUTH_PENDING" => PaymentStatus::AuthPending,
            "AUTH_DONE" => PaymentStatus::AuthDone,
            "SID_ISSUED" => PaymentStatus::SidIssued,
            "APPROVED" => PaymentStatus::Approved,
            "PARTIALLY_CANCELED" => PaymentStatus::PartiallyCanceled,
            "CANCELED" => PaymentStatus::Canceled,
            "AUTH_FAILED" => PaymentStatus::AuthFailed,
            "QUIT" => PaymentStatus::Quit,
            "FAILED" => PaymentStatus::Failed,
            other => return Err(format!("unknown payment status: {other}")),
        };
        Ok(status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentModel {
    pub id: i64,
    pub reservation_id: i64,
    pub item_name: String,
    pub quantity: i32,
    pub total_amount: i64,
    pub tax_free_amount: i64,
    pub status: PaymentStatus,
    pub tid: Option<String>,
    pub cid: String,
    pub payment_method_type: Option<String>,
    pub approved_amount: Option<Amount>,
    /// Cumulative amount refunded so far.
    pub canceled_amount: Amount,
    /// Amount still refundable.
    pub cancel_available_amount: Amount,
    pub created_at: NaiveDateTime,
    pub approved_at: Option<NaiveDateTime>,
    pub canceled_at: Option<NaiveDateTime>,
    /// Optimistic lock counter, bumped on every committed transition.
    pub version: i32,
}

impl PaymentModel {
    /// Price of one seat, truncated toward zero.
    pub fn unit_price(&self) -> i64 {
        if self.quantity <= 0 {
            return 0;
        }
        self.total_amount / i64::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_provider_status() {
        let cases = [
            ("READY", PaymentStatus::Ready),
            ("SEND_TMS", PaymentStatus::Sent),
            ("OPEN_PAYMENT", PaymentStatus::Opened),
            ("SELECT_METHOD", PaymentStatus::MethodSelected),
            ("ARS_WAITING", PaymentStatus::AuthPending),
            ("ARS_WAITING_ARS", PaymentStatus::AuthPending),
            ("AUTH_PASSWORD", PaymentStatus::AuthDone),
            ("ISSUED_SID", PaymentStatus::SidIssued),
            ("SUCCESS_PAYMENT", PaymentStatus::Approved),
            ("PART_CANCEL_PAYMENT", PaymentStatus::PartiallyCanceled),
            ("CANCEL_PAYMENT", PaymentStatus::Canceled),
            ("FAIL_AUTH_PASSWORD", PaymentStatus::AuthFailed),
            ("QUIT_PAYMENT", PaymentStatus::Quit),
            ("FAIL_PAYMENT", PaymentStatus::Failed),
        ];

        for (code, expected) in cases {
            assert_eq!(PaymentStatus::from_provider(code), Some(expected), "{code}");
        }
        assert_eq!(PaymentStatus::from_provider("SOMETHING_NEW"), None);
    }

    #[test]
    fn stored_form_parses_back() {
        for status in [
            PaymentStatus::Ready,
            PaymentStatus::PartiallyCanceled,
            PaymentStatus::AuthFailed,
        ] {
            assert_eq!(status.as_str().parse::<PaymentStatus>(), Ok(status));
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(PaymentStatus::Canceled.is_terminal());
        assert!(PaymentStatus::Quit.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(!PaymentStatus::PartiallyCanceled.is_terminal());
        assert!(!PaymentStatus::Approved.is_terminal());
    }
}
