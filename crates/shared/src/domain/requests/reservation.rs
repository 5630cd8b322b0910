use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    #[validate(range(min = 1, message = "Lesson id must be positive"))]
    pub lesson_id: i64,

    pub quantity: i32,
}

/// Row pair written when a reservation is opened.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: i64,
    pub lesson_id: i64,
    pub quantity: i32,
    pub item_name: String,
    pub total_amount: i64,
    pub tax_free_amount: i64,
    pub cid: String,
}
