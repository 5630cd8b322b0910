pub mod auth;
pub mod gateway;
pub mod jwt;
pub mod lesson;
pub mod payment;
pub mod refresh_token;
pub mod refund;
pub mod reservation;
pub mod settlement;
pub mod token;
pub mod user;
