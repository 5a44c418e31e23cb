//! Gamification ledger model.

use chrono::NaiveDate;
use learnloop_core::gamification::LedgerSnapshot;
use learnloop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_stats` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(rename = "totalXP")]
    pub total_xp: i64,
    pub level: i32,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity_date: Option<NaiveDate>,
    pub lessons_completed: i32,
    pub courses_completed: i32,
    pub perfect_scores: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserStats {
    /// Figures the achievement rules evaluate.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            level: self.level,
            lessons_completed: self.lessons_completed,
            courses_completed: self.courses_completed,
            perfect_scores: self.perfect_scores,
            current_streak: self.current_streak,
        }
    }
}

/// New ledger values written back after an award.
#[derive(Debug, Clone)]
pub struct UpdateUserStats {
    pub total_xp: i64,
    pub level: i32,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity_date: Option<NaiveDate>,
    pub lessons_completed: i32,
    pub courses_completed: i32,
    pub perfect_scores: i32,
}
