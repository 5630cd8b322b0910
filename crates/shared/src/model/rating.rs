use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Running star tally of a class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClassRating {
    pub total_stars: i64,
    pub review_count: i64,
}

impl ClassRating {
    pub const MIN_STARS: i32 = 1;
    pub const MAX_STARS: i32 = 5;

    pub fn record_review(&mut self, stars: i32) -> Result<(), ServiceError> {
        if !(Self::MIN_STARS..=Self::MAX_STARS).contains(&stars) {
            return Err(ServiceError::Validation(vec![format!(
                "stars: must be between {} and {} (got {stars})",
                Self::MIN_STARS,
                Self::MAX_STARS
            )]));
        }
        self.total_stars += i64::from(stars);
        self.review_count += 1;
        Ok(())
    }

    pub fn average(&self) -> f64 {
        if self.review_count == 0 {
            return 0.0;
        }
        self.total_stars as f64 / self.review_count as f64
    }
}
