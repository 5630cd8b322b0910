use crate::{
    abstract_trait::{
        jwt::DynJwtService, refresh_token::command::DynRefreshTokenCommandRepository,
        token::TokenServiceTrait,
    },
    config::TokenType,
    domain::requests::CreateRefreshToken,
    errors::ServiceError,
    model::user::UserModel,
};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};

pub struct TokenService {
    token: DynJwtService,
    refresh: DynRefreshTokenCommandRepository,
}

impl TokenService {
    pub fn new(token: DynJwtService, refresh: DynRefreshTokenCommandRepository) -> Self {
        Self { token, refresh }
    }
}

#[async_trait]
impl TokenServiceTrait for TokenService {
    async fn create_access_token(&self, user: &UserModel) -> Result<String, ServiceError> {
        match self
            .token
            .generate_token(user.id, user.role, TokenType::Access)
        {
            Ok(token) => {
                info!("✅ Generated access token for user_id {}", user.id);
                Ok(token)
            }
            Err(e) => {
                error!(
                    "❌ Failed to generate access token for user_id {}: {e:?}",
                    user.id
                );
                Err(e)
            }
        }
    }

    /// Issues a refresh token and makes it the only one stored for the user.
    async fn create_refresh_token(&self, user: &UserModel) -> Result<String, ServiceError> {
        let token = self
            .token
            .generate_token(user.id, user.role, TokenType::Refresh)?;

        if let Err(e) = self.refresh.delete_by_user_id(user.id).await {
            error!("❌ Failed to delete existing refresh token: {e:?}");
        }

        let req = CreateRefreshToken {
            user_id: user.id,
            token: token.clone(),
            expires_at: (Utc::now() + TokenType::Refresh.lifetime()).naive_utc(),
        };

        match self.refresh.create(&req).await {
            Ok(_) => {
                info!("✅ Created refresh token for user_id {}", user.id);
                Ok(token)
            }
            Err(e) => {
                error!("❌ Failed to create refresh token: {e:?}");
                Err(ServiceError::from(e))
            }
        }
    }
}
