use crate::{
    abstract_trait::settlement::repository::SettlementRepositoryTrait,
    errors::RepositoryError,
    model::{
        reservation::ReservationStatus,
        sales::{SalesAggregate, SalesRow},
    },
    repository::memory::{InMemoryLessonRepository, InMemoryReservationRepository},
};
use async_trait::async_trait;
use chrono::Datelike;
use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};
use tokio::sync::RwLock;

/// Reads sales straight from the in-memory reservation and lesson stores.
#[derive(Clone)]
pub struct InMemorySettlementRepository {
    reservations: InMemoryReservationRepository,
    lessons: InMemoryLessonRepository,
    snapshots: Arc<RwLock<HashMap<(i64, i32), SalesAggregate>>>,
}

impl InMemorySettlementRepository {
    pub fn new(
        reservations: InMemoryReservationRepository,
        lessons: InMemoryLessonRepository,
    ) -> Self {
        Self {
            reservations,
            lessons,
            snapshots: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn snapshot_count(&self) -> usize {
        self.snapshots.read().await.len()
    }
}

#[async_trait]
impl SettlementRepositoryTrait for InMemorySettlementRepository {
    async fn find_tutor_ids(&self) -> Result<Vec<i64>, RepositoryError> {
        let tutors: BTreeSet<i64> = self
            .lessons
            .all()
            .await
            .into_iter()
            .map(|l| l.tutor_id)
            .collect();
        Ok(tutors.into_iter().collect())
    }

    async fn find_confirmed_reservations_by_tutor_and_year(
        &self,
        tutor_id: i64,
        year: i32,
    ) -> Result<Vec<SalesRow>, RepositoryError> {
        let lessons: HashMap<i64, _> = self
            .lessons
            .all()
            .await
            .into_iter()
            .filter(|l| l.tutor_id == tutor_id && l.lesson_date.year() == year)
            .map(|l| (l.id, l))
            .collect();

        let mut rows: Vec<SalesRow> = self
            .reservations
            .all()
            .await
            .into_iter()
            .filter(|b| b.reservation.status == ReservationStatus::Confirmed)
            .filter_map(|b| {
                lessons.get(&b.reservation.lesson_id).map(|lesson| SalesRow {
                    reservation_id: b.reservation.id,
                    class_id: lesson.class_id,
                    class_name: lesson.class_name.clone(),
                    lesson_date: lesson.lesson_date,
                    total_price: b.payment.total_amount,
                })
            })
            .collect();

        rows.sort_by_key(|r| (r.class_id, r.lesson_date, r.reservation_id));
        Ok(rows)
    }

    async fn save_snapshot(&self, aggregate: &SalesAggregate) -> Result<(), RepositoryError> {
        self.snapshots
            .write()
            .await
            .insert((aggregate.tutor_id, aggregate.year), aggregate.clone());
        Ok(())
    }

    async fn find_snapshot(
        &self,
        tutor_id: i64,
        year: i32,
    ) -> Result<Option<SalesAggregate>, RepositoryError> {
        Ok(self.snapshots.read().await.get(&(tutor_id, year)).cloned())
    }
}
