use crate::{
    abstract_trait::{
        gateway::DynPaymentGateway, payment::CheckoutServiceTrait,
        reservation::service::DynReservationService,
    },
    config::Claims,
    domain::{
        requests::{ApprovePaymentRequest, ApproveRequest, CreateReservationRequest, PrepareRequest},
        responses::{ApiResponse, PrepareResponse, ReservationResponse},
    },
    errors::{GatewayError, RepositoryError, ServiceError},
    model::{
        reservation::{AbandonOutcome, ReservationWithPayment},
        user::Role,
    },
    utils::{Method, Telemetry},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use tracing::{error, info, warn};

pub struct CheckoutService {
    reservations: DynReservationService,
    gateway: DynPaymentGateway,
    telemetry: Telemetry,
}

impl std::fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutService")
            .field("reservations", &"DynReservationService")
            .field("gateway", &"DynPaymentGateway")
            .finish()
    }
}

impl CheckoutService {
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

    fn prepare_request(booking: &ReservationWithPayment) -> PrepareRequest {
        PrepareRequest {
            partner_order_id: booking.reservation.id.to_string(),
            partner_user_id: booking.reservation.user_id.to_string(),
            item_name: booking.payment.item_name.clone(),
            quantity: booking.payment.quantity,
            total_amount: booking.payment.total_amount,
            tax_free_amount: booking.payment.tax_free_amount,
        }
    }

    async fn open_checkout(
        &self,
        user_id: i64,
        request: &CreateReservationRequest,
    ) -> Result<PrepareResponse, ServiceError> {
        let booking = self
            .reservations
            .create(user_id, request.lesson_id, request.quantity)
            .await?;
        let reservation_id = booking.id();

        let prepared = match self.gateway.prepare(&Self::prepare_request(&booking)).await {
            Ok(prepared) => prepared,
            Err(e) => {
                error!("❌ Checkout could not be opened for reservation {reservation_id}: {e}");
                if let Err(abandon_err) = self
                    .reservations
                    .abandon(reservation_id, AbandonOutcome::Failed)
                    .await
                {
                    error!(
                        "❌ Failed to close reservation {reservation_id} after prepare failure: {abandon_err}"
                    );
                }
                return Err(e.into());
            }
        };

        let booking = self
            .reservations
            .attach_tid(reservation_id, &prepared)
            .await?;

        Ok(PrepareResponse {
            reservation: booking.into(),
            redirect_url: prepared.redirect_url,
        })
    }

    async fn settle_approval(
        &self,
        request: &ApprovePaymentRequest,
    ) -> Result<ReservationWithPayment, ServiceError> {
        let reservation_id = request.reservation_id;
        let booking = self.reservations.find_by_id(reservation_id).await?;
        booking.ensure_pending()?;

        let tid = booking.payment.tid.clone().ok_or_else(|| {
            ServiceError::Validation(vec![format!(
                "reservation {reservation_id} has no open checkout"
            )])
        })?;

        let approve = ApproveRequest {
            tid,
            pg_token: request.pg_token.clone(),
            partner_order_id: reservation_id.to_string(),
            partner_user_id: booking.reservation.user_id.to_string(),
        };

        match self.gateway.approve(&approve).await {
            Ok(approved) => self
                .reservations
                .confirm(reservation_id, &approved)
                .await
                .inspect_err(|e| {
                    error!(
                        "❌ Provider approved tid {} but reservation {reservation_id} was not confirmed: {e}",
                        approved.tid
                    );
                }),
            Err(GatewayError::Rejected { code, message }) => {
                warn!("💳 Approval rejected for reservation {reservation_id} ({code}): {message}");
                self.reservations
                    .abandon(reservation_id, AbandonOutcome::Failed)
                    .await?;
                Err(GatewayError::Rejected { code, message }.into())
            }
            Err(e) => {
                warn!("📡 Approval for reservation {reservation_id} left pending: {e}");
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl CheckoutServiceTrait for CheckoutService {
    async fn request_payment(
        &self,
        user_id: i64,
        request: &CreateReservationRequest,
    ) -> Result<ApiResponse<PrepareResponse>, ServiceError> {
        let tracing_ctx = self.telemetry.start_tracing(
            "RequestPayment",
            vec![
                KeyValue::new("component", "checkout"),
                KeyValue::new("user.id", user_id.to_string()),
                KeyValue::new("lesson.id", request.lesson_id.to_string()),
            ],
        );

        match self.open_checkout(user_id, request).await {
            Ok(response) => {
                self.telemetry.complete_tracing_success(
                    &tracing_ctx,
                    Method::Post,
                    "Checkout opened",
                );
                Ok(ApiResponse::success("Checkout opened", response))
            }
            Err(e) => {
                self.telemetry.complete_tracing_error(
                    &tracing_ctx,
                    Method::Post,
                    &format!("Failed to open checkout: {e}"),
                );
                Err(e)
            }
        }
    }

    async fn approve_payment(
        &self,
        request: &ApprovePaymentRequest,
    ) -> Result<ApiResponse<ReservationResponse>, ServiceError> {
        let tracing_ctx = self.telemetry.start_tracing(
            "ApprovePayment",
            vec![
                KeyValue::new("component", "checkout"),
                KeyValue::new("reservation.id", request.reservation_id.to_string()),
            ],
        );

        match self.settle_approval(request).await {
            Ok(booking) => {
                info!("✅ Reservation {} confirmed", booking.id());
                self.telemetry.complete_tracing_success(
                    &tracing_ctx,
                    Method::Get,
                    "Payment approved",
                );
                Ok(ApiResponse::success("Payment approved", booking.into()))
            }
            Err(e) => {
                self.telemetry.complete_tracing_error(
                    &tracing_ctx,
                    Method::Get,
                    &format!("Failed to approve payment: {e}"),
                );
                Err(e)
            }
        }
    }

    async fn abandon_payment(
        &self,
        reservation_id: i64,
        outcome: AbandonOutcome,
    ) -> Result<ApiResponse<ReservationResponse>, ServiceError> {
        let tracing_ctx = self.telemetry.start_tracing(
            "AbandonPayment",
            vec![
                KeyValue::new("component", "checkout"),
                KeyValue::new("reservation.id", reservation_id.to_string()),
            ],
        );

        match self.reservations.abandon(reservation_id, outcome).await {
            Ok(booking) => {
                self.telemetry.complete_tracing_success(
                    &tracing_ctx,
                    Method::Get,
                    "Checkout abandoned",
                );
                Ok(ApiResponse::success("Checkout abandoned", booking.into()))
            }
            Err(e) => {
                self.telemetry.complete_tracing_error(
                    &tracing_ctx,
                    Method::Get,
                    &format!("Failed to abandon checkout: {e}"),
                );
                Err(e)
            }
        }
    }

    async fn find_reservation(
        &self,
        requester: &Claims,
        reservation_id: i64,
    ) -> Result<ApiResponse<ReservationResponse>, ServiceError> {
        let booking = self.reservations.find_by_id(reservation_id).await?;

        if booking.reservation.user_id != requester.sub && requester.role != Role::Admin {
            info!(
                "🔍 User {} asked for reservation {reservation_id} owned by someone else",
                requester.sub
            );
            return Err(ServiceError::Repo(RepositoryError::NotFound));
        }

        Ok(ApiResponse::success(
            "Reservation retrieved",
            booking.into(),
        ))
    }

    async fn find_my_reservations(
        &self,
        user_id: i64,
    ) -> Result<ApiResponse<Vec<ReservationResponse>>, ServiceError> {
        let bookings = self.reservations.find_by_user(user_id).await?;
        let data: Vec<ReservationResponse> = bookings.into_iter().map(Into::into).collect();

        info!("✅ Found {} reservations for user {user_id}", data.len());
        Ok(ApiResponse::success("Reservations retrieved", data))
    }
}
