use crate::errors::{
    error::ErrorResponse,
    service::{ErrorKind, ServiceError},
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

#[derive(Debug)]
pub struct AppErrorHttp(pub ServiceError);

impl From<ServiceError> for AppErrorHttp {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppErrorHttp {
    fn into_response(self) -> Response {
        let err = self.0;

        let (status, message) = match err.kind() {
            ErrorKind::Validation => {
                warn!("📝 Validation failed: {err}");
                let message = match &err {
                    ServiceError::Validation(errors) => {
                        format!("Validation failed: {}", errors.join(", "))
                    }
                    other => other.to_string(),
                };
                (StatusCode::BAD_REQUEST, message)
            }
            ErrorKind::StateConflict => {
                warn!("⚡ State conflict: {err}");
                (StatusCode::CONFLICT, err.to_string())
            }
            ErrorKind::GatewayRejected => {
                warn!("💳 Payment rejected by provider: {err}");
                (
                    StatusCode::PAYMENT_REQUIRED,
                    "Payment was rejected by the provider, please retry checkout".to_string(),
                )
            }
            ErrorKind::GatewayUnavailable => {
                error!("📡 Payment provider unavailable: {err}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Payment provider is unavailable, please retry checkout".to_string(),
                )
            }
            ErrorKind::PersistenceConflict => {
                warn!("🔒 Persistence conflict: {err}");
                (
                    StatusCode::CONFLICT,
                    "Resource was modified concurrently, please retry".to_string(),
                )
            }
            ErrorKind::NotFound => {
                info!("🔍 Resource not found: {err}");
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            ErrorKind::Unauthorized => {
                warn!("🔐 Unauthorized: {err}");
                let message = match &err {
                    ServiceError::TokenExpired => "Token has expired",
                    ServiceError::InvalidTokenType => "Invalid token type",
                    ServiceError::InvalidCredentials => "Invalid credentials",
                    _ => "Invalid token",
                };
                (StatusCode::UNAUTHORIZED, message.to_string())
            }
            ErrorKind::Forbidden => {
                warn!("🚫 Forbidden: {err}");
                (StatusCode::FORBIDDEN, "Forbidden".to_string())
            }
            ErrorKind::Internal => {
                error!("🔥 Internal error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            status: "error".to_string(),
            message,
        });

        (status, body).into_response()
    }
}
