use crate::{
    errors::{gateway::GatewayError, repository::RepositoryError},
    model::{payment::PaymentStatus, reservation::ReservationStatus},
};
use jsonwebtoken::errors::Error as JwtError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Cancel amount {requested} exceeds cancelable amount {available}")]
    ExcessiveCancelAmount { requested: i64, available: i64 },

    #[error("Reservation {reservation_id} is not pending (status: {status})")]
    NotPending {
        reservation_id: i64,
        status: ReservationStatus,
    },

    #[error("Reservation {reservation_id} is not confirmed (status: {status})")]
    NotConfirmed {
        reservation_id: i64,
        status: ReservationStatus,
    },

    #[error("Payment {payment_id} is in terminal status {status}")]
    PaymentFinalized {
        payment_id: i64,
        status: PaymentStatus,
    },

    #[error("Settlement run already in progress")]
    SettlementAlreadyRunning,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid Token")]
    InvalidTokenType,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification used at the HTTP boundary and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    StateConflict,
    GatewayRejected,
    GatewayUnavailable,
    PersistenceConflict,
    NotFound,
    Unauthorized,
    Forbidden,
    Internal,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_)
            | ServiceError::InvalidQuantity(_)
            | ServiceError::ExcessiveCancelAmount { .. } => ErrorKind::Validation,

            ServiceError::NotPending { .. }
            | ServiceError::NotConfirmed { .. }
            | ServiceError::PaymentFinalized { .. }
            | ServiceError::SettlementAlreadyRunning => ErrorKind::StateConflict,

            ServiceError::Gateway(gateway_err) => match gateway_err {
                GatewayError::Unavailable(_) => ErrorKind::GatewayUnavailable,
                GatewayError::Rejected { .. } => ErrorKind::GatewayRejected,
                GatewayError::AlreadyApproved(_) => ErrorKind::StateConflict,
                GatewayError::ExcessiveCancelAmount { .. } => ErrorKind::Validation,
                GatewayError::InvalidResponse(_) => ErrorKind::Internal,
            },

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => ErrorKind::NotFound,
                RepositoryError::Conflict(_) | RepositoryError::AlreadyExists(_) => {
                    ErrorKind::PersistenceConflict
                }
                RepositoryError::ForeignKey(_) => ErrorKind::Validation,
                RepositoryError::Sqlx(_) | RepositoryError::Custom(_) => ErrorKind::Internal,
            },

            ServiceError::InvalidCredentials
            | ServiceError::Jwt(_)
            | ServiceError::TokenExpired
            | ServiceError::InvalidTokenType => ErrorKind::Unauthorized,

            ServiceError::Forbidden(_) => ErrorKind::Forbidden,

            ServiceError::Internal(_) => ErrorKind::Internal,
        }
    }
}
