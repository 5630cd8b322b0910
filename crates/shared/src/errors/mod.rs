mod error;
mod gateway;
mod http;
mod repository;
mod service;
mod validate;

pub use self::error::ErrorResponse;
pub use self::gateway::GatewayError;
pub use self::http::AppErrorHttp;
pub use self::repository::RepositoryError;
pub use self::service::{ErrorKind, ServiceError};
pub use self::validate::format_validation_errors;
