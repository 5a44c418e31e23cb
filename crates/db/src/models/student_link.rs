//! Guardian/student oversight link model.

use learnloop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `student_links` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentLink {
    pub id: DbId,
    pub guardian_id: DbId,
    pub student_id: DbId,
    pub relationship: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A linked student with headline progress figures.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedStudent {
    pub student_id: DbId,
    pub username: String,
    pub display_name: Option<String>,
    pub grade_level: Option<i32>,
    pub relationship: String,
    #[serde(rename = "totalXP")]
    pub total_xp: i64,
    pub level: i32,
    pub active_courses: i64,
    pub completed_courses: i64,
}
