mod command;
mod query;
mod row;

pub use self::command::ReservationCommandRepository;
pub use self::query::ReservationQueryRepository;
