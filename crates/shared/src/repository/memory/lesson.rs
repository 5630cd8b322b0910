use crate::{
    abstract_trait::lesson::LessonQueryRepositoryTrait, errors::RepositoryError,
    model::lesson::LessonModel,
};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryLessonRepository {
    lessons: Arc<RwLock<HashMap<i64, LessonModel>>>,
}

impl InMemoryLessonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, lesson: LessonModel) {
        self.lessons.write().await.insert(lesson.id, lesson);
    }

    pub async fn all(&self) -> Vec<LessonModel> {
        self.lessons.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl LessonQueryRepositoryTrait for InMemoryLessonRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<LessonModel>, RepositoryError> {
        Ok(self.lessons.read().await.get(&id).cloned())
    }
}
