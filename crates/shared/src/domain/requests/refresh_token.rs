use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct CreateRefreshToken {
    pub user_id: i64,
    pub token: String,
    pub expires_at: NaiveDateTime,
}
