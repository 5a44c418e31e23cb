//! Unlocked achievement model.

use learnloop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_achievements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAchievement {
    pub id: DbId,
    pub user_id: DbId,
    pub achievement_code: String,
    pub unlocked_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
