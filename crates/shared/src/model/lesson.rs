use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A scheduled session of a class. Read-only to the booking core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LessonModel {
    pub id: i64,
    pub class_id: i64,
    pub class_name: String,
    pub tutor_id: i64,
    /// Price of one seat.
    pub price: i64,
    pub lesson_date: NaiveDate,
    pub remaining_capacity: i32,
}
