//! Repository for the `user_achievements` table.

use learnloop_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::achievement::UserAchievement;

/// Column list for `user_achievements` queries.
const COLUMNS: &str = "id, user_id, achievement_code, unlocked_at, created_at, updated_at";

/// Provides persistence for unlocked achievements.
pub struct AchievementRepo;

impl AchievementRepo {
    /// Achievements a user has unlocked, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserAchievement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_achievements \
             WHERE user_id = $1 \
             ORDER BY unlocked_at DESC, id DESC"
        );
        sqlx::query_as::<_, UserAchievement>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Codes already unlocked by a user.
    pub async fn codes_for_user(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT achievement_code FROM user_achievements WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(conn)
        .await
    }

    /// Grant an achievement. Returns `None` if the user already had it.
    pub async fn grant(
        conn: &mut PgConnection,
        user_id: DbId,
        code: &str,
    ) -> Result<Option<UserAchievement>, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_achievements (user_id, achievement_code) \
             VALUES ($1, $2) \
             ON CONFLICT (user_id, achievement_code) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserAchievement>(&query)
            .bind(user_id)
            .bind(code)
            .fetch_optional(conn)
            .await
    }
}
