use crate::{
    abstract_trait::lesson::LessonQueryRepositoryTrait, config::ConnectionPool,
    errors::RepositoryError, model::lesson::LessonModel,
};
use async_trait::async_trait;
use tracing::error;

pub struct LessonQueryRepository {
    db: ConnectionPool,
}

impl LessonQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LessonQueryRepositoryTrait for LessonQueryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<LessonModel>, RepositoryError> {
        sqlx::query_as::<_, LessonModel>(
            r#"
            SELECT l.id, l.class_id, c.name AS class_name, c.tutor_id,
                   l.price, l.lesson_date, l.remaining_capacity
            FROM lessons l
            JOIN classes c ON c.id = l.class_id
            WHERE l.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Database error loading lesson {id}: {e:?}");
            RepositoryError::from(e)
        })
    }
}
