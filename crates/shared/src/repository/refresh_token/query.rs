use crate::{
    abstract_trait::refresh_token::query::RefreshTokenQueryRepositoryTrait, config::ConnectionPool,
    errors::RepositoryError, model::refresh_token::RefreshTokenModel,
};
use async_trait::async_trait;
use tracing::error;

pub struct RefreshTokenQueryRepository {
    db: ConnectionPool,
}

impl RefreshTokenQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn get_conn(
        &self,
    ) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, RepositoryError> {
        self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {e:?}");
            RepositoryError::from(e)
        })
    }
}

#[async_trait]
impl RefreshTokenQueryRepositoryTrait for RefreshTokenQueryRepository {
    async fn find_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Option<RefreshTokenModel>, RepositoryError> {
        let mut conn = self.get_conn().await?;

        sqlx::query_as::<_, RefreshTokenModel>(
            r#"
            SELECT id, user_id, token, expires_at
            FROM refresh_tokens
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }

    async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenModel>, RepositoryError> {
        let mut conn = self.get_conn().await?;

        sqlx::query_as::<_, RefreshTokenModel>(
            r#"
            SELECT id, user_id, token, expires_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }
}
