//! Repository for the `lessons` table.

use learnloop_core::types::DbId;
use sqlx::PgPool;

use crate::models::lesson::{CreateLesson, Lesson, NextLesson};

/// Column list for `lessons` queries.
const COLUMNS: &str = "id, course_id, title, description, lesson_type, lesson_order, xp_reward, \
                       required_score, duration_minutes, content_url, created_at, updated_at";

/// Provides CRUD operations for lessons.
pub struct LessonRepo;

impl LessonRepo {
    /// Insert a lesson and add its XP reward to the course total.
    pub async fn create(pool: &PgPool, input: &CreateLesson) -> Result<Lesson, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO lessons \
                 (course_id, title, description, lesson_type, lesson_order, xp_reward, \
                  required_score, duration_minutes, content_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        let lesson = sqlx::query_as::<_, Lesson>(&query)
            .bind(input.course_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.lesson_type)
            .bind(input.lesson_order)
            .bind(input.xp_reward)
            .bind(input.required_score)
            .bind(input.duration_minutes)
            .bind(&input.content_url)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE courses SET total_xp = total_xp + $2 WHERE id = $1")
            .bind(input.course_id)
            .bind(input.xp_reward)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(lesson)
    }

    /// The order value a newly appended lesson should take.
    pub async fn next_order(pool: &PgPool, course_id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(lesson_order), 0) + 1 FROM lessons WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_one(pool)
        .await
    }

    /// Find a lesson by ID, scoped to its course.
    pub async fn find_in_course(
        pool: &PgPool,
        course_id: DbId,
        lesson_id: DbId,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lessons WHERE id = $1 AND course_id = $2");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(lesson_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// All lessons of a course in sequence order.
    pub async fn list_for_course(pool: &PgPool, course_id: DbId) -> Result<Vec<Lesson>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM lessons WHERE course_id = $1 ORDER BY lesson_order");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Number of lessons in a course.
    pub async fn count_for_course(pool: &PgPool, course_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM lessons WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(pool)
            .await
    }

    /// The lesson with the smallest order strictly greater than `after_order`.
    pub async fn next_after(
        pool: &PgPool,
        course_id: DbId,
        after_order: i32,
    ) -> Result<Option<NextLesson>, sqlx::Error> {
        sqlx::query_as::<_, NextLesson>(
            "SELECT id, title, lesson_order, lesson_type FROM lessons \
             WHERE course_id = $1 AND lesson_order > $2 \
             ORDER BY lesson_order \
             LIMIT 1",
        )
        .bind(course_id)
        .bind(after_order)
        .fetch_optional(pool)
        .await
    }
}
