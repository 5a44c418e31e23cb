//! Repository for the `certificates` and `certificate_sequences` tables.

use learnloop_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::certificate::{Certificate, CreateCertificate};

/// Column list for `certificates` queries.
const COLUMNS: &str = "id, user_id, course_id, enrollment_id, certificate_number, \
                       verification_code, course_title, student_name, issued_at, \
                       created_at, updated_at";

/// Provides persistence for issued certificates.
pub struct CertificateRepo;

impl CertificateRepo {
    /// Atomically allocate the next sequence value for `year`, starting at 1.
    pub async fn next_sequence(conn: &mut PgConnection, year: i32) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO certificate_sequences (year, last_value) VALUES ($1, 1) \
             ON CONFLICT (year) DO UPDATE SET \
                 last_value = certificate_sequences.last_value + 1 \
             RETURNING last_value",
        )
        .bind(year)
        .fetch_one(conn)
        .await
    }

    /// Insert a certificate.
    ///
    /// Returns `None` when the verification code collides with an existing
    /// one so the caller can retry with a fresh code. Any other unique
    /// violation (a second certificate for the same user and course) is
    /// returned as an error.
    pub async fn insert(
        conn: &mut PgConnection,
        input: &CreateCertificate,
    ) -> Result<Option<Certificate>, sqlx::Error> {
        let query = format!(
            "INSERT INTO certificates \
                 (user_id, course_id, enrollment_id, certificate_number, verification_code, \
                  course_title, student_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT ON CONSTRAINT uq_certificates_verification_code DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Certificate>(&query)
            .bind(input.user_id)
            .bind(input.course_id)
            .bind(input.enrollment_id)
            .bind(&input.certificate_number)
            .bind(&input.verification_code)
            .bind(&input.course_title)
            .bind(&input.student_name)
            .fetch_optional(conn)
            .await
    }

    /// The certificate a user holds for a course, if any.
    ///
    /// Runs on the pool or inside a transaction.
    pub async fn find_for_user_course<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Certificate>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM certificates WHERE user_id = $1 AND course_id = $2");
        sqlx::query_as::<_, Certificate>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(executor)
            .await
    }

    /// Look up a certificate by its verification code.
    pub async fn find_by_verification_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Certificate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM certificates WHERE verification_code = $1");
        sqlx::query_as::<_, Certificate>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// A user's certificates, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Certificate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM certificates WHERE user_id = $1 ORDER BY issued_at DESC, id DESC"
        );
        sqlx::query_as::<_, Certificate>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Number of certificates a user holds.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM certificates WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
