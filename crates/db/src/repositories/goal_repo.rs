//! Repository for the `goals` table.

use learnloop_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::goal::{CreateGoal, Goal, UpdateGoal};

/// Column list for `goals` queries.
const COLUMNS: &str = "id, user_id, title, description, goal_type, current_value, target_value, \
                       unit, status, streak_count, due_date, completed_at, created_at, updated_at";

/// Provides CRUD operations for goals. Every query is scoped to the owner.
pub struct GoalRepo;

impl GoalRepo {
    /// Insert a new active goal.
    pub async fn create(pool: &PgPool, input: &CreateGoal) -> Result<Goal, sqlx::Error> {
        let query = format!(
            "INSERT INTO goals (user_id, title, description, goal_type, target_value, unit, due_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Goal>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.goal_type)
            .bind(input.target_value)
            .bind(&input.unit)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Find one of the user's goals.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Goal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM goals WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Lock one of the user's goals for the rest of the transaction.
    ///
    /// Progress and status changes read the goal through this so concurrent
    /// writers on the same goal apply one after the other.
    pub async fn lock_for_user(
        conn: &mut PgConnection,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Goal>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM goals WHERE id = $1 AND user_id = $2 FOR UPDATE");
        sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// List a user's goals, optionally filtered by status, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Goal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM goals \
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Goal>(&query)
            .bind(user_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Update a goal. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the goal does not exist for this user.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateGoal,
    ) -> Result<Option<Goal>, sqlx::Error> {
        let query = format!(
            "UPDATE goals SET \
                 title = COALESCE($3, title), \
                 description = COALESCE($4, description), \
                 target_value = COALESCE($5, target_value), \
                 due_date = COALESCE($6, due_date) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.target_value)
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
    }

    /// Set a goal's status.
    pub async fn set_status(
        conn: &mut PgConnection,
        user_id: DbId,
        id: DbId,
        status: &str,
    ) -> Result<Option<Goal>, sqlx::Error> {
        let query = format!(
            "UPDATE goals SET status = $3 WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .bind(user_id)
            .bind(status)
            .fetch_optional(conn)
            .await
    }

    /// Store the result of a progress increment on a goal locked with
    /// [`GoalRepo::lock_for_user`].
    ///
    /// `None` means the goal was no longer active.
    pub async fn record_progress(
        conn: &mut PgConnection,
        user_id: DbId,
        id: DbId,
        current_value: i32,
        completed: bool,
        streak_count: i32,
    ) -> Result<Option<Goal>, sqlx::Error> {
        let query = format!(
            "UPDATE goals SET \
                 current_value = $3, \
                 streak_count = $5, \
                 status = CASE WHEN $4 THEN 'completed' ELSE status END, \
                 completed_at = CASE WHEN $4 THEN NOW() ELSE completed_at END \
             WHERE id = $1 AND user_id = $2 AND status = 'active' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .bind(user_id)
            .bind(current_value)
            .bind(completed)
            .bind(streak_count)
            .fetch_optional(conn)
            .await
    }

    /// Delete a goal. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
