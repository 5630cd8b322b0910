mod api;
mod auth;
mod refund;
mod reservation;
mod settlement;

pub use self::api::ApiResponse;
pub use self::auth::TokenResponse;
pub use self::refund::RefundResponse;
pub use self::reservation::{PaymentResponse, PrepareResponse, ReservationResponse};
pub use self::settlement::{SalesResponse, SettlementReport};
