use crate::{
    config::Claims,
    domain::{
        requests::OAuthSuccessRequest,
        responses::{ApiResponse, TokenResponse},
    },
    errors::ServiceError,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynAuthService = Arc<dyn AuthServiceTrait + Send + Sync>;

#[async_trait]
pub trait AuthServiceTrait {
    async fn issue_tokens(
        &self,
        request: &OAuthSuccessRequest,
    ) -> Result<ApiResponse<TokenResponse>, ServiceError>;
    async fn refresh_token(&self, token: &str) -> Result<ApiResponse<TokenResponse>, ServiceError>;
    fn verify_access(&self, token: &str) -> Result<Claims, ServiceError>;
}
