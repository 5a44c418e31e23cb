//! Course entity model and DTOs.

use learnloop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub subject: String,
    pub difficulty: String,
    pub is_premium: bool,
    pub is_published: bool,
    pub published_at: Option<Timestamp>,
    #[serde(rename = "totalXP")]
    pub total_xp: i32,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A catalog row: the course plus its lesson count.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub course: Course,
    pub lesson_count: i64,
}

/// Minimal course reference used for prerequisite listings.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRef {
    pub id: DbId,
    pub title: String,
    pub slug: String,
}

/// Prerequisite row joined with the user's completion state.
#[derive(Debug, Clone, FromRow)]
pub struct PrerequisiteProgress {
    pub course_id: DbId,
    pub title: String,
    pub completed: bool,
}

/// DTO for creating a draft course.
#[derive(Debug, Clone)]
pub struct CreateCourse {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub subject: String,
    pub difficulty: String,
    pub is_premium: bool,
    pub created_by: Option<DbId>,
}
