//! Data access for the schedule engine.
//!
//! The engine only needs three primitives: the lessons of an entity in a date
//! window, the nearest lesson with a known week label on either side of a
//! date, and whether the entity exists at all. [`PgLessonStore`] answers them
//! from Postgres; [`MemoryLessonStore`] answers them from a fixed list.

mod memory;
mod postgres;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use timetable_core::AppError;
use timetable_models::{EntityProfile, EntitySelector, LessonRecord};

pub use memory::MemoryLessonStore;
pub use postgres::PgLessonStore;

use crate::utils::tracing::record_error;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("lesson store query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("lesson store did not answer within {0:?}")]
    Timeout(Duration),
}

/// Search direction for the nearest labelled lesson. Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearestLesson {
    Before(NaiveDate),
    After(NaiveDate),
}

#[async_trait]
pub trait LessonStore: Send + Sync {
    /// Lessons of the entity dated within `[start, end]`, one record per lesson.
    /// For teacher and auditorium selectors only the matching participant
    /// pairs are attached.
    async fn fetch_lesson_window(
        &self,
        selector: &EntitySelector,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LessonRecord>, StoreError>;

    /// Closest lesson of the entity carrying a numerator or denominator label.
    async fn fetch_nearest_labeled_lesson(
        &self,
        selector: &EntitySelector,
        direction: NearestLesson,
    ) -> Result<Option<LessonRecord>, StoreError>;

    /// Header data of the entity, or `None` if it does not exist.
    async fn entity_profile(
        &self,
        selector: &EntitySelector,
    ) -> Result<Option<EntityProfile>, StoreError>;

    async fn entity_exists(&self, selector: &EntitySelector) -> Result<bool, StoreError> {
        Ok(self.entity_profile(selector).await?.is_some())
    }
}

/// Runs one store call under the configured timeout. Timeouts and database
/// failures both surface as 503.
pub async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    let error = match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(e)) => e,
        Err(_) => StoreError::Timeout(timeout),
    };

    record_error(&error.to_string());
    Err(AppError::service_unavailable(error))
}
