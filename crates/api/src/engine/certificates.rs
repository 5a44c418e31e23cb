//! Certificate issuance and lookup.

use chrono::{Datelike, Utc};
use learnloop_core::certificate::{
    format_number, generate_verification_code, normalize_verification_code, MAX_CODE_ATTEMPTS,
};
use learnloop_core::error::CoreError;
use learnloop_core::progression::ENROLLMENT_COMPLETED;
use learnloop_core::types::DbId;
use learnloop_db::models::certificate::{Certificate, CreateCertificate};
use learnloop_db::repositories::{CertificateRepo, CourseRepo, EnrollmentRepo, UserRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Result of an issue request.
#[derive(Debug)]
pub enum IssueOutcome {
    /// A new certificate was created by this call.
    Issued(Certificate),
    /// The user already held a certificate for the course.
    Existing(Certificate),
}

/// Issue the certificate for `user`'s completed enrollment in `course_id`.
///
/// Idempotent per (user, course). Issuing locks the enrollment row and
/// re-checks for a certificate under that lock, so concurrent requests
/// queue behind the first and then see its certificate. The sequence
/// allocation, the insert and the `certificate_earned` flag commit
/// together, so a failed insert never burns a number.
pub async fn issue(pool: &PgPool, user: &AuthUser, course_id: DbId) -> AppResult<IssueOutcome> {
    let enrollment = EnrollmentRepo::find_for_user_course(pool, user.user_id, course_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Enrollment for course",
            id: course_id,
        })?;

    if enrollment.status != ENROLLMENT_COMPLETED {
        return Err(CoreError::Conflict(
            "Course must be completed before a certificate can be issued".into(),
        )
        .into());
    }

    if let Some(existing) =
        CertificateRepo::find_for_user_course(pool, user.user_id, course_id).await?
    {
        return Ok(IssueOutcome::Existing(existing));
    }

    let course = CourseRepo::find_by_id(pool, course_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        })?;
    let student = UserRepo::find_by_id(pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        })?;

    let mut tx = pool.begin().await?;

    EnrollmentRepo::lock(&mut *tx, enrollment.id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Enrollment for course",
            id: course_id,
        })?;
    if let Some(existing) =
        CertificateRepo::find_for_user_course(&mut *tx, user.user_id, course_id).await?
    {
        return Ok(IssueOutcome::Existing(existing));
    }

    let year = Utc::now().year();
    let sequence = CertificateRepo::next_sequence(&mut *tx, year).await?;
    let certificate_number = format_number(year, sequence).map_err(AppError::InternalError)?;

    let mut issued = None;
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let input = CreateCertificate {
            user_id: user.user_id,
            course_id,
            enrollment_id: enrollment.id,
            certificate_number: certificate_number.clone(),
            verification_code: generate_verification_code(),
            course_title: course.title.clone(),
            student_name: student.public_name().to_string(),
        };
        match CertificateRepo::insert(&mut *tx, &input).await? {
            Some(certificate) => {
                issued = Some(certificate);
                break;
            }
            None => {
                tracing::warn!(
                    user_id = user.user_id,
                    course_id,
                    attempt,
                    "Verification code collision",
                );
            }
        }
    }
    let certificate = issued.ok_or_else(|| {
        AppError::InternalError("Could not generate a unique verification code".into())
    })?;

    EnrollmentRepo::mark_certificate_earned(&mut *tx, enrollment.id).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = user.user_id,
        course_id,
        certificate_number = %certificate.certificate_number,
        "Certificate issued",
    );

    Ok(IssueOutcome::Issued(certificate))
}

/// Look up a certificate by its public verification code.
///
/// Codes are matched case-insensitively; anything that cannot be a code is
/// reported the same way as an unknown one.
pub async fn verify(pool: &PgPool, code: &str) -> AppResult<Certificate> {
    let not_found = || AppError::NotFound(format!("Certificate with code {code} not found"));
    let normalized = normalize_verification_code(code).ok_or_else(not_found)?;
    CertificateRepo::find_by_verification_code(pool, &normalized)
        .await?
        .ok_or_else(not_found)
}
