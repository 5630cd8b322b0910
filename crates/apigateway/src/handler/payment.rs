use crate::{
    middleware::{
        jwt,
        validate::{SimpleValidatedJson, ValidatedQuery},
    },
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::Path,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::{
    abstract_trait::{payment::DynCheckoutService, refund::DynRefundService},
    config::Claims,
    domain::{
        requests::{ApprovePaymentRequest, CheckoutCallback, RefundRequest},
        responses::{ApiResponse, RefundResponse, ReservationResponse},
    },
    errors::AppErrorHttp,
    model::reservation::AbandonOutcome,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/payments/approve",
    tag = "Payment",
    params(ApprovePaymentRequest),
    responses(
        (status = 200, description = "Payment approved, reservation confirmed", body = ApiResponse<ReservationResponse>),
        (status = 402, description = "Approval rejected by the provider"),
        (status = 409, description = "Reservation is not pending"),
        (status = 503, description = "Payment provider unavailable")
    )
)]
pub async fn approve_payment(
    Extension(service): Extension<DynCheckoutService>,
    ValidatedQuery(params): ValidatedQuery<ApprovePaymentRequest>,
) -> Result<impl IntoResponse, AppErrorHttp> {
    let response = service.approve_payment(&params).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/payments/cancel",
    tag = "Payment",
    params(CheckoutCallback),
    responses(
        (status = 200, description = "Checkout left by the user", body = ApiResponse<ReservationResponse>),
        (status = 409, description = "Reservation is not pending")
    )
)]
pub async fn cancel_checkout(
    Extension(service): Extension<DynCheckoutService>,
    ValidatedQuery(params): ValidatedQuery<CheckoutCallback>,
) -> Result<impl IntoResponse, AppErrorHttp> {
    let response = service
        .abandon_payment(params.reservation_id, AbandonOutcome::Quit)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/payments/fail",
    tag = "Payment",
    params(CheckoutCallback),
    responses(
        (status = 200, description = "Checkout failed at the provider", body = ApiResponse<ReservationResponse>),
        (status = 409, description = "Reservation is not pending")
    )
)]
pub async fn fail_checkout(
    Extension(service): Extension<DynCheckoutService>,
    ValidatedQuery(params): ValidatedQuery<CheckoutCallback>,
) -> Result<impl IntoResponse, AppErrorHttp> {
    let response = service
        .abandon_payment(params.reservation_id, AbandonOutcome::Failed)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/payments/{payment_id}/refund",
    tag = "Payment",
    security(("bearer_auth" = [])),
    params(("payment_id" = i64, Path, description = "Payment ID")),
    request_body = RefundRequest,
    responses(
        (status = 200, description = "Refund applied", body = ApiResponse<RefundResponse>),
        (status = 400, description = "Excessive cancel amount or invalid quantity"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Reservation is not confirmed"),
        (status = 503, description = "Payment provider unavailable")
    )
)]
pub async fn refund_payment(
    Extension(service): Extension<DynRefundService>,
    Extension(claims): Extension<Claims>,
    Path(payment_id): Path<i64>,
    SimpleValidatedJson(body): SimpleValidatedJson<RefundRequest>,
) -> Result<impl IntoResponse, AppErrorHttp> {
    let response = service.request_refund(&claims, payment_id, &body).await?;
    Ok(Json(response))
}

pub fn payment_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let callback_routes = OpenApiRouter::new()
        .route("/api/payments/approve", get(approve_payment))
        .route("/api/payments/cancel", get(cancel_checkout))
        .route("/api/payments/fail", get(fail_checkout))
        .layer(Extension(app_state.di_container.checkout_service.clone()));

    let private_routes = OpenApiRouter::new()
        .route("/api/payments/{payment_id}/refund", post(refund_payment))
        .route_layer(middleware::from_fn(jwt::auth))
        .layer(Extension(app_state.di_container.refund_service.clone()))
        .layer(Extension(app_state.di_container.auth_service.clone()));

    callback_routes.merge(private_routes)
}
