mod auth;
mod gateway;
mod payment;
mod refresh_token;
mod refund;
mod reservation;
mod settlement;

pub use self::auth::{OAuthSuccessRequest, RefreshTokenRequest};
pub use self::gateway::{ApproveRequest, CancelRequest, PrepareRequest};
pub use self::payment::{ApprovePaymentRequest, CheckoutCallback};
pub use self::refresh_token::CreateRefreshToken;
pub use self::refund::RefundRequest;
pub use self::reservation::{CreateReservationRequest, NewReservation};
pub use self::settlement::FindSales;
