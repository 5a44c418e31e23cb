//! Enrollment entity model.

use learnloop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub status: String,
    pub lessons_completed: i32,
    pub total_lessons: i32,
    #[serde(rename = "totalXPEarned")]
    pub total_xp_earned: i32,
    pub average_score: Option<f64>,
    pub certificate_earned: bool,
    pub enrolled_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub last_accessed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Enrollment joined with the course fields dashboards display.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentWithCourse {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub course_title: String,
    pub course_slug: String,
    pub course_subject: String,
    pub course_difficulty: String,
}
