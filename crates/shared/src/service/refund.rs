use crate::{
    abstract_trait::{
        gateway::DynPaymentGateway, refund::RefundServiceTrait,
        reservation::service::DynReservationService,
    },
    config::Claims,
    domain::{
        requests::{CancelRequest, RefundRequest},
        responses::{ApiResponse, RefundResponse},
    },
    errors::ServiceError,
    model::{refund::RefundRecord, reservation::ReservationWithPayment, user::Role},
    utils::{Method, Telemetry},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use tracing::{error, info, warn};

/// What will be sent to the provider for one refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelPlan {
    pub amount: i64,
    pub tax_free: i64,
}

/// Resolves a refund request against the current cancelable balance.
///
/// A seat count wins over an explicit amount. With neither, everything still
/// cancelable is refunded.
pub fn plan_cancel(
    booking: &ReservationWithPayment,
    requested_quantity: Option<i32>,
    cancel_amount: Option<i64>,
) -> Result<CancelPlan, ServiceError> {
    let available = booking.payment.cancel_available_amount;

    let amount = match (requested_quantity, cancel_amount) {
        (Some(quantity), _) => {
            if quantity <= 0 {
                return Err(ServiceError::InvalidQuantity(quantity));
            }
            let unit_price = booking.payment.unit_price();
            if quantity > booking.reservation.quantity {
                return Err(ServiceError::ExcessiveCancelAmount {
                    requested: unit_price.saturating_mul(i64::from(quantity)),
                    available: available.total,
                });
            }
            unit_price * i64::from(quantity)
        }
        (None, Some(amount)) => {
            if amount <= 0 {
                return Err(ServiceError::Validation(vec![format!(
                    "cancel_amount: must be positive (got {amount})"
                )]));
            }
            amount
        }
        (None, None) => available.total,
    };

    if amount <= 0 || amount > available.total {
        return Err(ServiceError::ExcessiveCancelAmount {
            requested: amount,
            available: available.total,
        });
    }

    // truncating share of what is left tax free
    let tax_free = (i128::from(available.tax_free) * i128::from(amount)
        / i128::from(available.total)) as i64;

    Ok(CancelPlan { amount, tax_free })
}

pub struct RefundService {
    reservations: DynReservationService,
    gateway: DynPaymentGateway,
    telemetry: Telemetry,
}

impl std::fmt::Debug for RefundService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefundService")
            .field("reservations", &"DynReservationService")
            .field("gateway", &"DynPaymentGateway")
            .finish()
    }
}

impl RefundService {
    pub fn new(
        reservations: DynReservationService,
        gateway: DynPaymentGateway,
        telemetry: Telemetry,
    ) -> Self {
        Self {
            reservations,
            gateway,
            telemetry,
        }
    }

    async fn execute(
        &self,
        booking: &ReservationWithPayment,
        requested_quantity: Option<i32>,
        cancel_amount: Option<i64>,
    ) -> Result<RefundRecord, ServiceError> {
        booking.ensure_cancelable()?;
        let plan = plan_cancel(booking, requested_quantity, cancel_amount)?;

        let tid = booking.payment.tid.clone().ok_or_else(|| {
            ServiceError::Internal(format!(
                "approved payment {} has no provider transaction id",
                booking.payment.id
            ))
        })?;
        let available = booking.payment.cancel_available_amount.total;

        info!(
            "💸 Refunding {} (tax free {}) of {available} on payment {}",
            plan.amount, plan.tax_free, booking.payment.id
        );

        let canceled = self
            .gateway
            .cancel(&CancelRequest {
                tid,
                cancel_amount: plan.amount,
                cancel_tax_free_amount: plan.tax_free,
                cancel_available_amount: available,
            })
            .await?;

        let full = plan.amount == available;
        let (_, record) = self
            .reservations
            .cancel(booking.id(), &canceled, full)
            .await
            .inspect_err(|e| {
                error!(
                    "❌ Provider refunded {} on tid {} but payment {} was not updated: {e}",
                    canceled.approved_cancel_amount.total, canceled.tid, booking.payment.id
                );
            })?;

        Ok(record)
    }
}

#[async_trait]
impl RefundServiceTrait for RefundService {
    async fn refund(
        &self,
        payment_id: i64,
        requested_quantity: Option<i32>,
        cancel_amount: Option<i64>,
    ) -> Result<RefundRecord, ServiceError> {
        let tracing_ctx = self.telemetry.start_tracing(
            "Refund",
            vec![
                KeyValue::new("component", "refund"),
                KeyValue::new("payment.id", payment_id.to_string()),
            ],
        );

        let result = match self.reservations.find_by_payment_id(payment_id).await {
            Ok(booking) => {
                self.execute(&booking, requested_quantity, cancel_amount)
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(record) => {
                self.telemetry.complete_tracing_success(
                    &tracing_ctx,
                    Method::Post,
                    &format!(
                        "Refunded {} on payment {payment_id}, {} left",
                        record.approved_cancel_this_request.total,
                        record.cancel_available_remaining.total
                    ),
                );
                Ok(record)
            }
            Err(e) => {
                self.telemetry.complete_tracing_error(
                    &tracing_ctx,
                    Method::Post,
                    &format!("Refund of payment {payment_id} failed: {e}"),
                );
                Err(e)
            }
        }
    }

    async fn request_refund(
        &self,
        requester: &Claims,
        payment_id: i64,
        request: &RefundRequest,
    ) -> Result<ApiResponse<RefundResponse>, ServiceError> {
        let booking = self.reservations.find_by_payment_id(payment_id).await?;

        if booking.reservation.user_id != requester.sub && requester.role != Role::Admin {
            warn!(
                "🚫 User {} tried to refund payment {payment_id} it does not own",
                requester.sub
            );
            return Err(ServiceError::Forbidden(format!(
                "payment {payment_id} belongs to another user"
            )));
        }

        let record = self
            .refund(payment_id, request.quantity, request.cancel_amount)
            .await?;

        let message = if record.is_full() {
            "Payment fully refunded"
        } else {
            "Payment partially refunded"
        };

        Ok(ApiResponse::success(
            message,
            RefundResponse::new(payment_id, record),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        amount::Amount,
        payment::{PaymentModel, PaymentStatus},
        reservation::{ReservationModel, ReservationStatus},
    };
    use chrono::NaiveDate;

    fn confirmed(quantity: i32, unit_price: i64, available: Amount) -> ReservationWithPayment {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        let total = unit_price * i64::from(quantity);
        ReservationWithPayment {
            reservation: ReservationModel {
                id: 1,
                user_id: 1,
                lesson_id: 1,
                quantity,
                status: ReservationStatus::Confirmed,
                created_at: at,
            },
            payment: PaymentModel {
                id: 1,
                reservation_id: 1,
                item_name: "Baking".into(),
                quantity,
                total_amount: total,
                tax_free_amount: available.tax_free,
                status: PaymentStatus::Approved,
                tid: Some("T1".into()),
                cid: "TC0ONETIME".into(),
                payment_method_type: Some("MONEY".into()),
                approved_amount: Some(available),
                canceled_amount: Amount::ZERO,
                cancel_available_amount: available,
                created_at: at,
                approved_at: Some(at),
                canceled_at: None,
                version: 1,
            },
        }
    }

    #[test]
    fn quantity_refund_uses_unit_price() {
        let booking = confirmed(2, 10000, Amount::total_only(20000));
        let plan = plan_cancel(&booking, Some(1), None).unwrap();
        assert_eq!(
            plan,
            CancelPlan {
                amount: 10000,
                tax_free: 0
            }
        );
    }

    #[test]
    fn quantity_wins_over_explicit_amount() {
        let booking = confirmed(3, 5000, Amount::total_only(15000));
        let plan = plan_cancel(&booking, Some(2), Some(1)).unwrap();
        assert_eq!(plan.amount, 10000);
    }

    #[test]
    fn no_input_refunds_everything_left() {
        let mut booking = confirmed(2, 10000, Amount::total_only(20000));
        booking.payment.cancel_available_amount = Amount::total_only(10000);
        let plan = plan_cancel(&booking, None, None).unwrap();
        assert_eq!(plan.amount, 10000);
    }

    #[test]
    fn rejects_bad_quantities() {
        let booking = confirmed(2, 10000, Amount::total_only(20000));
        assert!(matches!(
            plan_cancel(&booking, Some(0), None),
            Err(ServiceError::InvalidQuantity(0))
        ));
        assert!(matches!(
            plan_cancel(&booking, Some(3), None),
            Err(ServiceError::ExcessiveCancelAmount { .. })
        ));
    }

    #[test]
    fn rejects_amount_above_remaining() {
        let mut booking = confirmed(2, 10000, Amount::total_only(20000));
        booking.payment.cancel_available_amount = Amount::total_only(10000);

        let err = plan_cancel(&booking, None, Some(10001)).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::ExcessiveCancelAmount {
                requested: 10001,
                available: 10000
            }
        ));
        assert!(plan_cancel(&booking, Some(2), None).is_err());
        assert!(matches!(
            plan_cancel(&booking, None, Some(-5)),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn tax_free_share_is_prorated_and_truncated() {
        let available = Amount {
            total: 30000,
            tax_free: 1000,
            ..Amount::ZERO
        };
        let booking = confirmed(3, 10000, available);
        let plan = plan_cancel(&booking, Some(1), None).unwrap();
        assert_eq!(plan.tax_free, 333);
    }
}
