//! Process-local repository implementations backed by `tokio::sync::RwLock`.

mod lesson;
mod refresh_token;
mod reservation;
mod settlement;
mod user;

pub use self::lesson::InMemoryLessonRepository;
pub use self::refresh_token::InMemoryRefreshTokenRepository;
pub use self::reservation::InMemoryReservationRepository;
pub use self::settlement::InMemorySettlementRepository;
pub use self::user::InMemoryUserRepository;
