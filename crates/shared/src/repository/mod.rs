pub mod lesson;
pub mod memory;
pub mod refresh_token;
pub mod reservation;
pub mod settlement;
pub mod user;
