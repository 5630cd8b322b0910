use crate::{
    abstract_trait::user::UserQueryRepositoryTrait,
    config::ConnectionPool,
    errors::RepositoryError,
    model::user::{Role, UserModel},
};
use async_trait::async_trait;
use sqlx::{Row, postgres::PgRow};
use tracing::error;

pub struct UserQueryRepository {
    db: ConnectionPool,
}

impl UserQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    fn user_from_row(row: &PgRow) -> Result<UserModel, RepositoryError> {
        let role: String = row.try_get("role")?;
        Ok(UserModel {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            role: role.parse::<Role>().map_err(RepositoryError::Custom)?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl UserQueryRepositoryTrait for UserQueryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserModel>, RepositoryError> {
        let row = sqlx::query("SELECT id, email, name, role, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Database error loading user {id}: {e:?}");
                RepositoryError::from(e)
            })?;

        row.as_ref().map(Self::user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, RepositoryError> {
        let row =
            sqlx::query("SELECT id, email, name, role, created_at FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.db)
                .await
                .map_err(|e| {
                    error!("❌ Database error loading user by email: {e:?}");
                    RepositoryError::from(e)
                })?;

        row.as_ref().map(Self::user_from_row).transpose()
    }
}
