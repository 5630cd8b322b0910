use crate::{
    abstract_trait::{
        auth::AuthServiceTrait,
        jwt::DynJwtService,
        refresh_token::{
            command::DynRefreshTokenCommandRepository, query::DynRefreshTokenQueryRepository,
        },
        token::DynTokenService,
        user::DynUserQueryRepository,
    },
    config::{Claims, TokenType},
    domain::{
        requests::OAuthSuccessRequest,
        responses::{ApiResponse, TokenResponse},
    },
    errors::ServiceError,
    model::user::UserModel,
    utils::{Method, Telemetry},
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::KeyValue;
use tracing::{error, info, warn};

pub struct AuthServiceDeps {
    pub users: DynUserQueryRepository,
    pub refresh_query: DynRefreshTokenQueryRepository,
    pub refresh_command: DynRefreshTokenCommandRepository,
    pub jwt: DynJwtService,
    pub tokens: DynTokenService,
    pub telemetry: Telemetry,
}

pub struct AuthService {
    users: DynUserQueryRepository,
    refresh_query: DynRefreshTokenQueryRepository,
    refresh_command: DynRefreshTokenCommandRepository,
    jwt: DynJwtService,
    tokens: DynTokenService,
    telemetry: Telemetry,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("jwt", &self.jwt)
            .finish()
    }
}

impl AuthService {
    pub fn new(deps: AuthServiceDeps) -> Self {
        let AuthServiceDeps {
            users,
            refresh_query,
            refresh_command,
            jwt,
            tokens,
            telemetry,
        } = deps;

        Self {
            users,
            refresh_query,
            refresh_command,
            jwt,
            tokens,
            telemetry,
        }
    }

    async fn issue_pair(&self, user: &UserModel) -> Result<TokenResponse, ServiceError> {
        let access_token = self.tokens.create_access_token(user).await?;
        let refresh_token = self.tokens.create_refresh_token(user).await?;
        Ok(TokenResponse {
            access_token,
            refresh_token,
        })
    }

    async fn rotate(&self, token: &str) -> Result<TokenResponse, ServiceError> {
        let claims = self.jwt.verify_token(token, TokenType::Refresh)?;

        let stored = self
            .refresh_query
            .find_by_token(token)
            .await?
            .filter(|stored| stored.user_id == claims.sub)
            .ok_or_else(|| {
                warn!("🔐 Refresh token for user {} is not the stored one", claims.sub);
                ServiceError::InvalidCredentials
            })?;

        if stored.expires_at <= Utc::now().naive_utc() {
            if let Err(e) = self.refresh_command.delete_token(token).await {
                error!("❌ Failed to delete expired refresh token: {e:?}");
            }
            return Err(ServiceError::TokenExpired);
        }

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        self.issue_pair(&user).await
    }
}

#[async_trait]
impl AuthServiceTrait for AuthService {
    async fn issue_tokens(
        &self,
        request: &OAuthSuccessRequest,
    ) -> Result<ApiResponse<TokenResponse>, ServiceError> {
        let tracing_ctx = self.telemetry.start_tracing(
            "IssueTokens",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.email", request.email.clone()),
            ],
        );

        let result = match self.users.find_by_email(&request.email).await {
            Ok(Some(user)) => self.issue_pair(&user).await,
            Ok(None) => Err(ServiceError::InvalidCredentials),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(tokens) => {
                self.telemetry.complete_tracing_success(
                    &tracing_ctx,
                    Method::Post,
                    "Tokens issued",
                );
                Ok(ApiResponse::success("Login successful", tokens))
            }
            Err(e) => {
                self.telemetry.complete_tracing_error(
                    &tracing_ctx,
                    Method::Post,
                    &format!("Login failed for {}: {e}", request.email),
                );
                Err(e)
            }
        }
    }

    async fn refresh_token(&self, token: &str) -> Result<ApiResponse<TokenResponse>, ServiceError> {
        let tracing_ctx = self.telemetry.start_tracing(
            "RefreshToken",
            vec![KeyValue::new("component", "auth")],
        );

        match self.rotate(token).await {
            Ok(tokens) => {
                info!("🔄 Refresh token rotated");
                self.telemetry.complete_tracing_success(
                    &tracing_ctx,
                    Method::Post,
                    "Token refreshed",
                );
                Ok(ApiResponse::success("Token refreshed", tokens))
            }
            Err(e) => {
                self.telemetry.complete_tracing_error(
                    &tracing_ctx,
                    Method::Post,
                    &format!("Token refresh failed: {e}"),
                );
                Err(e)
            }
        }
    }

    fn verify_access(&self, token: &str) -> Result<Claims, ServiceError> {
        self.jwt.verify_token(token, TokenType::Access)
    }
}
