use crate::{errors::ServiceError, model::user::UserModel};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynTokenService = Arc<dyn TokenServiceTrait + Send + Sync>;

#[async_trait]
pub trait TokenServiceTrait {
    async fn create_access_token(&self, user: &UserModel) -> Result<String, ServiceError>;
    async fn create_refresh_token(&self, user: &UserModel) -> Result<String, ServiceError>;
}
