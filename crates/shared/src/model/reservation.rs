use crate::{
    errors::{GatewayError, ServiceError},
    model::{
        gateway::{ApproveResult, CancelResult, PrepareResult},
        payment::{PaymentModel, PaymentStatus},
        refund::RefundRecord,
    },
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Canceled,
    PartiallyCanceled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Canceled => "CANCELED",
            ReservationStatus::PartiallyCanceled => "PARTIALLY_CANCELED",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ReservationStatus::Pending),
            "CONFIRMED" => Ok(ReservationStatus::Confirmed),
            "CANCELED" => Ok(ReservationStatus::Canceled),
            "PARTIALLY_CANCELED" => Ok(ReservationStatus::PartiallyCanceled),
            other => Err(format!("unknown reservation status: {other}")),
        }
    }
}

/// How an unpaid checkout ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbandonOutcome {
    /// The user left the provider's checkout page.
    Quit,
    /// The provider failed or rejected the payment.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationModel {
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    pub quantity: i32,
    pub status: ReservationStatus,
    pub created_at: NaiveDateTime,
}

/// A reservation together with the payment it owns.
///
/// Every transition mutates both halves and is persisted as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationWithPayment {
    pub reservation: ReservationModel,
    pub payment: PaymentModel,
}

impl ReservationWithPayment {
    pub fn id(&self) -> i64 {
        self.reservation.id
    }

    pub fn ensure_pending(&self) -> Result<(), ServiceError> {
        if self.reservation.status != ReservationStatus::Pending {
            return Err(ServiceError::NotPending {
                reservation_id: self.reservation.id,
                status: self.reservation.status,
            });
        }
        if self.payment.status.is_terminal() {
            return Err(ServiceError::PaymentFinalized {
                payment_id: self.payment.id,
                status: self.payment.status,
            });
        }
        Ok(())
    }

    pub fn ensure_cancelable(&self) -> Result<(), ServiceError> {
        match self.reservation.status {
            ReservationStatus::Confirmed | ReservationStatus::PartiallyCanceled => Ok(()),
            status => Err(ServiceError::NotConfirmed {
                reservation_id: self.reservation.id,
                status,
            }),
        }
    }

    /// Records the provider transaction id handed out by `prepare`.
    pub fn attach_tid(&mut self, prepared: &PrepareResult) -> Result<(), ServiceError> {
        self.ensure_pending()?;
        self.payment.tid = Some(prepared.tid.clone());
        Ok(())
    }

    /// `PENDING -> CONFIRMED`, payment `-> APPROVED`.
    pub fn confirm(&mut self, approved: &ApproveResult) -> Result<(), ServiceError> {
        self.ensure_pending()?;

        if approved.amount.total != self.payment.total_amount {
            return Err(GatewayError::InvalidResponse(format!(
                "approved amount {} does not match payment total {}",
                approved.amount.total, self.payment.total_amount
            ))
            .into());
        }

        self.payment.status = PaymentStatus::Approved;
        self.payment.tid = Some(approved.tid.clone());
        self.payment.approved_amount = Some(approved.amount);
        self.payment.cancel_available_amount = approved.amount;
        self.payment.payment_method_type = Some(approved.payment_method_type.clone());
        self.payment.approved_at = Some(approved.approved_at);
        self.reservation.status = ReservationStatus::Confirmed;
        Ok(())
    }

    /// Folds a provider-confirmed cancellation into the running totals.
    ///
    /// `full` requests the `CANCELED` status; a cancellation that leaves
    /// nothing refundable is full regardless.
    pub fn cancel(
        &mut self,
        canceled: &CancelResult,
        full: bool,
    ) -> Result<RefundRecord, ServiceError> {
        self.ensure_cancelable()?;

        let approved = canceled.approved_cancel_amount;
        let available = self.payment.cancel_available_amount;
        let remaining =
            available
                .subtract(&approved)
                .ok_or(ServiceError::ExcessiveCancelAmount {
                    requested: approved.total,
                    available: available.total,
                })?;
        let cumulative = self.payment.canceled_amount + approved;

        if cumulative.total + remaining.total != self.payment.total_amount {
            return Err(ServiceError::Internal(format!(
                "refund totals drifted for payment {}: canceled {} + remaining {} != total {}",
                self.payment.id, cumulative.total, remaining.total, self.payment.total_amount
            )));
        }

        if full && !remaining.is_zero() {
            return Err(ServiceError::Validation(vec![format!(
                "full cancellation leaves {} still cancelable",
                remaining.total
            )]));
        }

        let (payment_status, reservation_status) = if remaining.is_zero() {
            (PaymentStatus::Canceled, ReservationStatus::Canceled)
        } else {
            (
                PaymentStatus::PartiallyCanceled,
                ReservationStatus::PartiallyCanceled,
            )
        };

        self.payment.canceled_amount = cumulative;
        self.payment.cancel_available_amount = remaining;
        self.payment.canceled_at = Some(canceled.canceled_at);
        self.payment.status = payment_status;
        self.reservation.status = reservation_status;

        Ok(RefundRecord {
            approved_cancel_this_request: approved,
            canceled_cumulative: cumulative,
            cancel_available_remaining: remaining,
        })
    }

    /// `PENDING -> CANCELED` without any money having moved.
    pub fn abandon(&mut self, outcome: AbandonOutcome) -> Result<(), ServiceError> {
        self.ensure_pending()?;

        self.payment.status = match outcome {
            AbandonOutcome::Quit => PaymentStatus::Quit,
            AbandonOutcome::Failed => PaymentStatus::Failed,
        };
        self.reservation.status = ReservationStatus::Canceled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::amount::Amount;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    fn pending(quantity: i32, unit_price: i64) -> ReservationWithPayment {
        let total = unit_price * i64::from(quantity);
        ReservationWithPayment {
            reservation: ReservationModel {
                id: 7,
                user_id: 1,
                lesson_id: 3,
                quantity,
                status: ReservationStatus::Pending,
                created_at: at(9),
            },
            payment: PaymentModel {
                id: 11,
                reservation_id: 7,
                item_name: "Pottery".into(),
                quantity,
                total_amount: total,
                tax_free_amount: 0,
                status: PaymentStatus::Ready,
                tid: None,
                cid: "TC0ONETIME".into(),
                payment_method_type: None,
                approved_amount: None,
                canceled_amount: Amount::ZERO,
                cancel_available_amount: Amount::total_only(total),
                created_at: at(9),
                approved_at: None,
                canceled_at: None,
                version: 0,
            },
        }
    }

    fn approval(total: i64) -> ApproveResult {
        ApproveResult {
            tid: "T1".into(),
            approved_at: at(10),
            amount: Amount::total_only(total),
            payment_method_type: "MONEY".into(),
        }
    }

    fn cancellation(amount: i64) -> CancelResult {
        CancelResult {
            tid: "T1".into(),
            status: PaymentStatus::PartiallyCanceled,
            approved_cancel_amount: Amount::total_only(amount),
            canceled_amount: Amount::total_only(amount),
            cancel_available_amount: Amount::ZERO,
            canceled_at: at(12),
        }
    }

    #[test]
    fn confirm_moves_pending_to_confirmed() {
        let mut booking = pending(2, 10000);
        booking.confirm(&approval(20000)).unwrap();

        assert_eq!(booking.reservation.status, ReservationStatus::Confirmed);
        assert_eq!(booking.payment.status, PaymentStatus::Approved);
        assert_eq!(booking.payment.cancel_available_amount.total, 20000);
        assert_eq!(booking.payment.payment_method_type.as_deref(), Some("MONEY"));
    }

    #[test]
    fn second_confirm_is_rejected_and_changes_nothing() {
        let mut booking = pending(2, 10000);
        booking.confirm(&approval(20000)).unwrap();
        let snapshot = booking.clone();

        let err = booking.confirm(&approval(20000)).unwrap_err();
        assert!(matches!(err, ServiceError::NotPending { .. }));
        assert_eq!(booking, snapshot);
    }

    #[test]
    fn confirm_rejects_mismatched_amount() {
        let mut booking = pending(2, 10000);
        let err = booking.confirm(&approval(15000)).unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Gateway(GatewayError::InvalidResponse(_))
        ));
        assert_eq!(booking.reservation.status, ReservationStatus::Pending);
    }

    #[test]
    fn partial_then_full_cancel() {
        let mut booking = pending(2, 10000);
        booking.confirm(&approval(20000)).unwrap();

        let first = booking.cancel(&cancellation(10000), false).unwrap();
        assert_eq!(first.approved_cancel_this_request.total, 10000);
        assert_eq!(first.canceled_cumulative.total, 10000);
        assert_eq!(first.cancel_available_remaining.total, 10000);
        assert_eq!(
            booking.reservation.status,
            ReservationStatus::PartiallyCanceled
        );
        assert_eq!(booking.payment.status, PaymentStatus::PartiallyCanceled);

        let second = booking.cancel(&cancellation(10000), true).unwrap();
        assert!(second.is_full());
        assert_eq!(second.canceled_cumulative.total, 20000);
        assert_eq!(booking.reservation.status, ReservationStatus::Canceled);
        assert_eq!(booking.payment.status, PaymentStatus::Canceled);

        let err = booking.cancel(&cancellation(1), false).unwrap_err();
        assert!(matches!(err, ServiceError::NotConfirmed { .. }));
    }

    #[test]
    fn cancel_requires_confirmation() {
        let mut booking = pending(1, 10000);
        let err = booking.cancel(&cancellation(10000), true).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotConfirmed {
                status: ReservationStatus::Pending,
                ..
            }
        ));
    }

    #[test]
    fn cancel_beyond_remaining_leaves_state_untouched() {
        let mut booking = pending(2, 10000);
        booking.confirm(&approval(20000)).unwrap();
        let snapshot = booking.clone();

        let err = booking.cancel(&cancellation(30000), false).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::ExcessiveCancelAmount {
                requested: 30000,
                available: 20000
            }
        ));
        assert_eq!(booking, snapshot);
    }

    #[test]
    fn abandon_only_from_pending() {
        let mut booking = pending(1, 10000);
        booking.abandon(AbandonOutcome::Quit).unwrap();
        assert_eq!(booking.reservation.status, ReservationStatus::Canceled);
        assert_eq!(booking.payment.status, PaymentStatus::Quit);

        let err = booking.abandon(AbandonOutcome::Failed).unwrap_err();
        assert!(matches!(err, ServiceError::NotPending { .. }));
    }
}
