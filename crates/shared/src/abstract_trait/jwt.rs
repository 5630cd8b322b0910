use crate::{
    config::{Claims, TokenType},
    errors::ServiceError,
    model::user::Role,
};
use std::sync::Arc;

pub type DynJwtService = Arc<dyn JwtServiceTrait + Send + Sync>;

pub trait JwtServiceTrait: std::fmt::Debug {
    fn generate_token(
        &self,
        user_id: i64,
        role: Role,
        token_type: TokenType,
    ) -> Result<String, ServiceError>;
    fn verify_token(&self, token: &str, expected: TokenType) -> Result<Claims, ServiceError>;
}
