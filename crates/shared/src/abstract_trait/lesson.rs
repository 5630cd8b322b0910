use crate::{errors::RepositoryError, model::lesson::LessonModel};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynLessonQueryRepository = Arc<dyn LessonQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait LessonQueryRepositoryTrait {
    async fn find_by_id(&self, id: i64) -> Result<Option<LessonModel>, RepositoryError>;
}
