use crate::{middleware::validate::SimpleValidatedJson, state::AppState};
use axum::{
    Extension, Json,
    response::IntoResponse,
    routing::{get, post},
};
use shared::{
    abstract_trait::auth::DynAuthService,
    domain::{
        requests::{OAuthSuccessRequest, RefreshTokenRequest},
        responses::{ApiResponse, TokenResponse},
    },
    errors::AppErrorHttp,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

pub async fn health_checker_handler() -> impl IntoResponse {
    const MESSAGE: &str = "One-day class reservation API";

    axum::Json(serde_json::json!({
        "status": "success",
        "message": MESSAGE
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/oauth2/success",
    request_body = OAuthSuccessRequest,
    responses(
        (status = 200, description = "Tokens issued", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Unknown account")
    ),
    tag = "Auth"
)]
pub async fn oauth2_success_handler(
    Extension(service): Extension<DynAuthService>,
    SimpleValidatedJson(body): SimpleValidatedJson<OAuthSuccessRequest>,
) -> Result<impl IntoResponse, AppErrorHttp> {
    let response = service.issue_tokens(&body).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token refreshed", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "Auth"
)]
pub async fn refresh_token_handler(
    Extension(service): Extension<DynAuthService>,
    SimpleValidatedJson(body): SimpleValidatedJson<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppErrorHttp> {
    let response = service.refresh_token(&body.refresh_token).await?;
    Ok(Json(response))
}

pub fn auth_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/auth/oauth2/success", post(oauth2_success_handler))
        .route("/api/auth/refresh", post(refresh_token_handler))
        .route("/api/healthchecker", get(health_checker_handler))
        .layer(Extension(app_state.di_container.auth_service.clone()))
}
