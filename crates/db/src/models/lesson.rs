//! Lesson entity model and DTOs.

use learnloop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub description: String,
    pub lesson_type: String,
    #[serde(rename = "order")]
    pub lesson_order: i32,
    pub xp_reward: i32,
    pub required_score: Option<i32>,
    pub duration_minutes: Option<i32>,
    pub content_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The lesson that follows a completed one.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextLesson {
    pub id: DbId,
    pub title: String,
    #[serde(rename = "order")]
    pub lesson_order: i32,
    pub lesson_type: String,
}

/// DTO for appending a lesson to a draft course.
#[derive(Debug, Clone)]
pub struct CreateLesson {
    pub course_id: DbId,
    pub title: String,
    pub description: String,
    pub lesson_type: String,
    pub lesson_order: i32,
    pub xp_reward: i32,
    pub required_score: Option<i32>,
    pub duration_minutes: Option<i32>,
    pub content_url: Option<String>,
}
