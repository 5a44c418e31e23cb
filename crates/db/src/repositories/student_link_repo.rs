//! Repository for the `student_links` table.

use learnloop_core::types::DbId;
use sqlx::PgPool;

use crate::models::student_link::{LinkedStudent, StudentLink};

/// Column list for `student_links` queries.
const COLUMNS: &str = "id, guardian_id, student_id, relationship, created_at, updated_at";

/// Provides persistence for guardian oversight links.
pub struct StudentLinkRepo;

impl StudentLinkRepo {
    /// Link a guardian to a student.
    pub async fn create(
        pool: &PgPool,
        guardian_id: DbId,
        student_id: DbId,
        relationship: &str,
    ) -> Result<StudentLink, sqlx::Error> {
        let query = format!(
            "INSERT INTO student_links (guardian_id, student_id, relationship) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudentLink>(&query)
            .bind(guardian_id)
            .bind(student_id)
            .bind(relationship)
            .fetch_one(pool)
            .await
    }

    /// Whether `guardian_id` is linked to `student_id`.
    pub async fn exists(
        pool: &PgPool,
        guardian_id: DbId,
        student_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                 SELECT 1 FROM student_links WHERE guardian_id = $1 AND student_id = $2 \
             )",
        )
        .bind(guardian_id)
        .bind(student_id)
        .fetch_one(pool)
        .await
    }

    /// Students linked to a guardian with their headline figures.
    pub async fn list_students(
        pool: &PgPool,
        guardian_id: DbId,
    ) -> Result<Vec<LinkedStudent>, sqlx::Error> {
        sqlx::query_as::<_, LinkedStudent>(
            "SELECT u.id AS student_id, u.username, u.display_name, u.grade_level, \
                    sl.relationship, \
                    COALESCE(us.total_xp, 0) AS total_xp, \
                    COALESCE(us.level, 1) AS level, \
                    (SELECT COUNT(*) FROM enrollments e \
                     WHERE e.user_id = u.id AND e.status = 'active') AS active_courses, \
                    (SELECT COUNT(*) FROM enrollments e \
                     WHERE e.user_id = u.id AND e.status = 'completed') AS completed_courses \
             FROM student_links sl \
             JOIN users u ON u.id = sl.student_id \
             LEFT JOIN user_stats us ON us.user_id = u.id \
             WHERE sl.guardian_id = $1 \
             ORDER BY u.username",
        )
        .bind(guardian_id)
        .fetch_all(pool)
        .await
    }
}
