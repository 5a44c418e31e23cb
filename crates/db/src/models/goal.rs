//! Goal entity model and DTOs.

use chrono::NaiveDate;
use learnloop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `goals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub goal_type: String,
    pub current_value: i32,
    pub target_value: i32,
    pub unit: String,
    pub status: String,
    pub streak_count: i32,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a goal.
#[derive(Debug, Clone)]
pub struct CreateGoal {
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub goal_type: String,
    pub target_value: i32,
    pub unit: String,
    pub due_date: Option<NaiveDate>,
}

/// DTO for editing a goal. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateGoal {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_value: Option<i32>,
    pub due_date: Option<NaiveDate>,
}
