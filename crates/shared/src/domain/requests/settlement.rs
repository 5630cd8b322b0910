use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct FindSales {
    #[validate(range(min = 1, message = "Tutor id must be positive"))]
    pub tutor_id: i64,

    #[validate(range(min = 1900, max = 2100, message = "Invalid year"))]
    pub year: i32,
}
