use axum::{
    Extension,
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use shared::{abstract_trait::auth::DynAuthService, errors::AppErrorHttp, errors::ServiceError};
use tracing::warn;

/// Verifies `Authorization: Bearer <access token>` and stores the claims in
/// the request extensions.
pub async fn auth(
    Extension(service): Extension<DynAuthService>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppErrorHttp> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            warn!("🔐 Missing bearer token on {}", req.uri().path());
            AppErrorHttp(ServiceError::InvalidCredentials)
        })?
        .to_string();

    let claims = service.verify_access(&token)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
