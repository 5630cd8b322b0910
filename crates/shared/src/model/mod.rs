pub mod amount;
pub mod gateway;
pub mod lesson;
pub mod payment;
pub mod rating;
pub mod refresh_token;
pub mod refund;
pub mod reservation;
pub mod sales;
pub mod user;
