use crate::{
    abstract_trait::refresh_token::command::RefreshTokenCommandRepositoryTrait,
    config::ConnectionPool, domain::requests::CreateRefreshToken, errors::RepositoryError,
    model::refresh_token::RefreshTokenModel,
};
use async_trait::async_trait;
use tracing::error;

pub struct RefreshTokenCommandRepository {
    db: ConnectionPool,
}

impl RefreshTokenCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenCommandRepositoryTrait for RefreshTokenCommandRepository {
    async fn create(
        &self,
        req: &CreateRefreshToken,
    ) -> Result<RefreshTokenModel, RepositoryError> {
        sqlx::query_as::<_, RefreshTokenModel>(
            r#"
            INSERT INTO refresh_tokens (user_id, token, expires_at, created_at)
            VALUES ($1, $2, $3, CURRENT_TIMESTAMP)
            RETURNING id, user_id, token, expires_at
            "#,
        )
        .bind(req.user_id)
        .bind(&req.token)
        .bind(req.expires_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to create refresh token: {e:?}");
            RepositoryError::from(e)
        })
    }

    async fn delete_token(&self, token: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete refresh token: {e:?}");
                RepositoryError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete refresh tokens of user {user_id}: {e:?}");
                RepositoryError::from(e)
            })?;
        Ok(())
    }
}
