//! Repository for the `user_stats` ledger table.

use learnloop_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::user_stats::{UpdateUserStats, UserStats};

/// Column list for `user_stats` queries.
const COLUMNS: &str = "id, user_id, total_xp, level, current_streak, longest_streak, \
                       last_activity_date, lessons_completed, courses_completed, perfect_scores, \
                       created_at, updated_at";

/// Provides access to the per-user gamification ledger.
pub struct UserStatsRepo;

impl UserStatsRepo {
    /// Read a user's ledger row, if one exists yet.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserStats>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_stats WHERE user_id = $1");
        sqlx::query_as::<_, UserStats>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Ensure the ledger row exists and lock it for the transaction.
    pub async fn lock_or_create(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<UserStats, sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_stats (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM user_stats WHERE user_id = $1 FOR UPDATE");
        sqlx::query_as::<_, UserStats>(&query)
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await
    }

    /// Write back recomputed ledger values.
    pub async fn save(
        conn: &mut PgConnection,
        user_id: DbId,
        input: &UpdateUserStats,
    ) -> Result<UserStats, sqlx::Error> {
        let query = format!(
            "UPDATE user_stats SET \
                 total_xp = $2, \
                 level = $3, \
                 current_streak = $4, \
                 longest_streak = $5, \
                 last_activity_date = $6, \
                 lessons_completed = $7, \
                 courses_completed = $8, \
                 perfect_scores = $9 \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserStats>(&query)
            .bind(user_id)
            .bind(input.total_xp)
            .bind(input.level)
            .bind(input.current_streak)
            .bind(input.longest_streak)
            .bind(input.last_activity_date)
            .bind(input.lessons_completed)
            .bind(input.courses_completed)
            .bind(input.perfect_scores)
            .fetch_one(conn)
            .await
    }
}
