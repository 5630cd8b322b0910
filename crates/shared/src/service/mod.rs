pub mod auth;
pub mod payment;
pub mod refund;
pub mod reservation;
pub mod settlement;
pub mod token;
