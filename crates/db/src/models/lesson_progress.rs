//! Per-lesson progress model.

use learnloop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `lesson_progress` table. Exists only for passed lessons.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub id: DbId,
    pub enrollment_id: DbId,
    pub lesson_id: DbId,
    pub score: Option<i32>,
    #[serde(rename = "timeSpent")]
    pub time_spent_secs: i32,
    pub attempts: i32,
    pub completed_at: Timestamp,
    pub last_attempt_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of the pass upsert: the row plus whether this call created it.
#[derive(Debug, Clone, FromRow)]
pub struct LessonPassRecord {
    #[sqlx(flatten)]
    pub progress: LessonProgress,
    pub first_pass: bool,
}
