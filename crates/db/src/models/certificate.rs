//! Certificate entity model and DTOs.

use learnloop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `certificates` table. Immutable once inserted.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub enrollment_id: Option<DbId>,
    pub certificate_number: String,
    pub verification_code: String,
    pub course_title: String,
    pub student_name: String,
    pub issued_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a certificate.
#[derive(Debug, Clone)]
pub struct CreateCertificate {
    pub user_id: DbId,
    pub course_id: DbId,
    pub enrollment_id: DbId,
    pub certificate_number: String,
    pub verification_code: String,
    pub course_title: String,
    pub student_name: String,
}
