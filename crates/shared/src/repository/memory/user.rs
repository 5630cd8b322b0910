use crate::{
    abstract_trait::user::UserQueryRepositoryTrait, errors::RepositoryError,
    model::user::UserModel,
};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<i64, UserModel>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: UserModel) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserQueryRepositoryTrait for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserModel>, RepositoryError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}
