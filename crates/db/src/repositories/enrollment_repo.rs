//! Repository for the `enrollments` table.
//!
//! Reads take `&PgPool`. The mutations performed while completing a lesson
//! take `&mut PgConnection` and expect to run inside the caller's
//! transaction, after [`EnrollmentRepo::touch`] or [`EnrollmentRepo::lock`]
//! has taken the row lock.

use learnloop_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::enrollment::{Enrollment, EnrollmentWithCourse};

/// Column list for `enrollments` queries.
const COLUMNS: &str = "id, user_id, course_id, status, lessons_completed, total_lessons, \
                       total_xp_earned, average_score, certificate_earned, enrolled_at, \
                       completed_at, last_accessed_at, created_at, updated_at";

/// Same columns qualified with the `e` alias for joined queries.
const E_COLUMNS: &str = "e.id, e.user_id, e.course_id, e.status, e.lessons_completed, \
                         e.total_lessons, e.total_xp_earned, e.average_score, \
                         e.certificate_earned, e.enrolled_at, e.completed_at, \
                         e.last_accessed_at, e.created_at, e.updated_at";

/// Provides CRUD operations for enrollments.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Insert a new active enrollment.
    ///
    /// A concurrent duplicate fails on `uq_enrollments_user_course`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        total_lessons: i32,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (user_id, course_id, total_lessons) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .bind(total_lessons)
            .fetch_one(pool)
            .await
    }

    /// Find the enrollment of a user in a course.
    pub async fn find_for_user_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM enrollments WHERE user_id = $1 AND course_id = $2");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// All enrollments of a user keyed by course, for catalog progress overlays.
    pub async fn list_for_user_courses(
        pool: &PgPool,
        user_id: DbId,
        course_ids: &[DbId],
    ) -> Result<Vec<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments WHERE user_id = $1 AND course_id = ANY($2)"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_ids)
            .fetch_all(pool)
            .await
    }

    /// A user's enrollments with course summaries, most recently active first.
    ///
    /// `status` optionally restricts the listing to `active` or `completed`.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<EnrollmentWithCourse>, sqlx::Error> {
        let query = format!(
            "SELECT {E_COLUMNS}, c.title AS course_title, c.slug AS course_slug, \
                    c.subject AS course_subject, c.difficulty AS course_difficulty \
             FROM enrollments e \
             JOIN courses c ON c.id = e.course_id \
             WHERE e.user_id = $1 AND ($2::TEXT IS NULL OR e.status = $2) \
             ORDER BY COALESCE(e.last_accessed_at, e.enrolled_at) DESC, e.id DESC"
        );
        sqlx::query_as::<_, EnrollmentWithCourse>(&query)
            .bind(user_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Number of enrollments the user holds in non-premium courses.
    pub async fn count_free_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments e \
             JOIN courses c ON c.id = e.course_id \
             WHERE e.user_id = $1 \
               AND c.is_premium = FALSE \
               AND e.status IN ('active', 'completed')",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Delete a user's enrollment. Lesson progress rows go with it by cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_for_user_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM enrollments WHERE user_id = $1 AND course_id = $2")
            .bind(user_id)
            .bind(course_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stamp `last_accessed_at`. Inside a transaction the UPDATE also takes
    /// the row lock, held until the transaction ends.
    pub async fn touch(conn: &mut PgConnection, id: DbId) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "UPDATE enrollments SET last_accessed_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_one(conn)
            .await
    }

    /// Lock an enrollment row for the rest of the transaction without
    /// changing it. `None` if the enrollment is gone.
    pub async fn lock(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Credit a first pass: set the new completed count and add XP.
    pub async fn record_first_pass(
        conn: &mut PgConnection,
        id: DbId,
        lessons_completed: i32,
        xp: i32,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "UPDATE enrollments SET \
                 lessons_completed = $2, \
                 total_xp_earned = total_xp_earned + $3 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .bind(lessons_completed)
            .bind(xp)
            .fetch_one(conn)
            .await
    }

    /// Recompute `average_score` from the scored progress rows.
    pub async fn refresh_average_score(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "UPDATE enrollments SET average_score = ( \
                 SELECT AVG(score)::DOUBLE PRECISION FROM lesson_progress \
                 WHERE enrollment_id = $1 AND score IS NOT NULL \
             ) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_one(conn)
            .await
    }

    /// Transition an active enrollment whose lessons are all done to
    /// `completed`. Returns `None` when it was already completed or is not
    /// finished, so the transition happens exactly once.
    pub async fn mark_completed(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "UPDATE enrollments SET status = 'completed', completed_at = NOW() \
             WHERE id = $1 AND status = 'active' AND lessons_completed >= total_lessons \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Flag a completed enrollment as having its certificate.
    pub async fn mark_certificate_earned(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE enrollments SET certificate_earned = TRUE \
             WHERE id = $1 AND status = 'completed'",
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(())
    }
}
