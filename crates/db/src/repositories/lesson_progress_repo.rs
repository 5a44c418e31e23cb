//! Repository for the `lesson_progress` table.

use learnloop_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::lesson_progress::{LessonPassRecord, LessonProgress};

/// Column list for `lesson_progress` queries.
const COLUMNS: &str = "id, enrollment_id, lesson_id, score, time_spent_secs, attempts, \
                       completed_at, last_attempt_at, created_at, updated_at";

/// Provides persistence for passed lessons.
pub struct LessonProgressRepo;

impl LessonProgressRepo {
    /// Record a passing attempt.
    ///
    /// The first pass inserts the row; later passes overwrite time, bump
    /// `attempts` and keep the original `completed_at`. A later pass replaces
    /// the score only when it carries one. `first_pass`
    /// is derived from `xmax = 0`, which only holds for a freshly inserted
    /// tuple, so concurrent callers agree on exactly one first pass.
    pub async fn upsert_pass(
        conn: &mut PgConnection,
        enrollment_id: DbId,
        lesson_id: DbId,
        score: Option<i32>,
        time_spent_secs: i32,
    ) -> Result<LessonPassRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO lesson_progress (enrollment_id, lesson_id, score, time_spent_secs) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (enrollment_id, lesson_id) DO UPDATE SET \
                 score = COALESCE(EXCLUDED.score, lesson_progress.score), \
                 time_spent_secs = EXCLUDED.time_spent_secs, \
                 attempts = lesson_progress.attempts + 1, \
                 last_attempt_at = NOW() \
             RETURNING {COLUMNS}, (xmax = 0) AS first_pass"
        );
        sqlx::query_as::<_, LessonPassRecord>(&query)
            .bind(enrollment_id)
            .bind(lesson_id)
            .bind(score)
            .bind(time_spent_secs)
            .fetch_one(conn)
            .await
    }

    /// All progress rows of an enrollment.
    pub async fn list_for_enrollment(
        pool: &PgPool,
        enrollment_id: DbId,
    ) -> Result<Vec<LessonProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lesson_progress WHERE enrollment_id = $1 ORDER BY completed_at"
        );
        sqlx::query_as::<_, LessonProgress>(&query)
            .bind(enrollment_id)
            .fetch_all(pool)
            .await
    }
}
