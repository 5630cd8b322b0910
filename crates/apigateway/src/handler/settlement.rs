use crate::{
    middleware::{jwt, validate::ValidatedQuery},
    state::AppState,
};
use axum::{Extension, Json, middleware, response::IntoResponse, routing::get};
use shared::{
    abstract_trait::settlement::service::DynSettlementService,
    config::Claims,
    domain::{
        requests::FindSales,
        responses::{ApiResponse, SalesResponse},
    },
    errors::AppErrorHttp,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/settlements",
    tag = "Settlement",
    security(("bearer_auth" = [])),
    params(FindSales),
    responses(
        (status = 200, description = "Yearly sales of a tutor", body = ApiResponse<SalesResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Sales of another tutor")
    )
)]
pub async fn get_sales(
    Extension(service): Extension<DynSettlementService>,
    Extension(claims): Extension<Claims>,
    ValidatedQuery(params): ValidatedQuery<FindSales>,
) -> Result<impl IntoResponse, AppErrorHttp> {
    let response = service.find_sales(&claims, &params).await?;
    Ok(Json(response))
}

pub fn settlement_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/settlements", get(get_sales))
        .route_layer(middleware::from_fn(jwt::auth))
        .layer(Extension(app_state.di_container.settlement_service.clone()))
        .layer(Extension(app_state.di_container.auth_service.clone()))
}
