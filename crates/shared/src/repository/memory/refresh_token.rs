use crate::{
    abstract_trait::refresh_token::{
        command::RefreshTokenCommandRepositoryTrait, query::RefreshTokenQueryRepositoryTrait,
    },
    domain::requests::CreateRefreshToken,
    errors::RepositoryError,
    model::refresh_token::RefreshTokenModel,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tokens {
    next_id: i64,
    rows: Vec<RefreshTokenModel>,
}

#[derive(Clone, Default)]
pub struct InMemoryRefreshTokenRepository {
    inner: Arc<RwLock<Tokens>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenCommandRepositoryTrait for InMemoryRefreshTokenRepository {
    async fn create(
        &self,
        req: &CreateRefreshToken,
    ) -> Result<RefreshTokenModel, RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.rows.iter().any(|t| t.token == req.token) {
            return Err(RepositoryError::AlreadyExists("refresh token".into()));
        }
        inner.next_id += 1;
        let row = RefreshTokenModel {
            id: inner.next_id,
            user_id: req.user_id,
            token: req.token.clone(),
            expires_at: req.expires_at,
        };
        inner.rows.push(row.clone());
        Ok(row)
    }

    async fn delete_token(&self, token: &str) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        let before = inner.rows.len();
        inner.rows.retain(|t| t.token != token);
        if inner.rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: i64) -> Result<(), RepositoryError> {
        self.inner.write().await.rows.retain(|t| t.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenQueryRepositoryTrait for InMemoryRefreshTokenRepository {
    async fn find_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Option<RefreshTokenModel>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .rows
            .iter()
            .rev()
            .find(|t| t.user_id == user_id)
            .cloned())
    }

    async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenModel>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .rows
            .iter()
            .find(|t| t.token == token)
            .cloned())
    }
}
