use crate::{
    middleware::{jwt, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::{
    abstract_trait::payment::DynCheckoutService,
    config::Claims,
    domain::{
        requests::CreateReservationRequest,
        responses::{ApiResponse, PrepareResponse, ReservationResponse},
    },
    errors::AppErrorHttp,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "Reservation",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation opened, redirect to checkout", body = ApiResponse<PrepareResponse>),
        (status = 400, description = "Invalid quantity"),
        (status = 401, description = "Unauthorized"),
        (status = 402, description = "Checkout rejected by the provider"),
        (status = 503, description = "Payment provider unavailable")
    )
)]
pub async fn create_reservation(
    Extension(service): Extension<DynCheckoutService>,
    Extension(claims): Extension<Claims>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppErrorHttp> {
    let response = service.request_payment(claims.sub, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/reservations/me",
    tag = "Reservation",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reservations of the caller", body = ApiResponse<Vec<ReservationResponse>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_my_reservations(
    Extension(service): Extension<DynCheckoutService>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppErrorHttp> {
    let response = service.find_my_reservations(claims.sub).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/reservations/{id}",
    tag = "Reservation",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    Extension(service): Extension<DynCheckoutService>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppErrorHttp> {
    let response = service.find_reservation(&claims, id).await?;
    Ok(Json(response))
}

pub fn reservation_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/reservations", post(create_reservation))
        .route("/api/reservations/me", get(get_my_reservations))
        .route("/api/reservations/{id}", get(get_reservation))
        .route_layer(middleware::from_fn(jwt::auth))
        .layer(Extension(app_state.di_container.checkout_service.clone()))
        .layer(Extension(app_state.di_container.auth_service.clone()))
}
