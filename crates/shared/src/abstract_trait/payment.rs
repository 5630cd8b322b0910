use crate::{
    config::Claims,
    domain::{
        requests::{ApprovePaymentRequest, CreateReservationRequest},
        responses::{ApiResponse, PrepareResponse, ReservationResponse},
    },
    errors::ServiceError,
    model::reservation::AbandonOutcome,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynCheckoutService = Arc<dyn CheckoutServiceTrait + Send + Sync>;

/// Drives a reservation through the provider's checkout.
#[async_trait]
pub trait CheckoutServiceTrait {
    async fn request_payment(
        &self,
        user_id: i64,
        request: &CreateReservationRequest,
    ) -> Result<ApiResponse<PrepareResponse>, ServiceError>;
    async fn approve_payment(
        &self,
        request: &ApprovePaymentRequest,
    ) -> Result<ApiResponse<ReservationResponse>, ServiceError>;
    async fn abandon_payment(
        &self,
        reservation_id: i64,
        outcome: AbandonOutcome,
    ) -> Result<ApiResponse<ReservationResponse>, ServiceError>;
    async fn find_reservation(
        &self,
        requester: &Claims,
        reservation_id: i64,
    ) -> Result<ApiResponse<ReservationResponse>, ServiceError>;
    async fn find_my_reservations(
        &self,
        user_id: i64,
    ) -> Result<ApiResponse<Vec<ReservationResponse>>, ServiceError>;
}
