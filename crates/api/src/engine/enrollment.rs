//! Enroll and unenroll.

use learnloop_core::eligibility::EntitlementCheck;
use learnloop_core::error::CoreError;
use learnloop_core::types::DbId;
use learnloop_db::models::enrollment::Enrollment;
use learnloop_db::repositories::{EnrollmentRepo, LessonRepo};
use sqlx::PgPool;

use super::eligibility;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Result of an enroll request.
#[derive(Debug)]
pub enum EnrollOutcome {
    /// A new enrollment was created.
    Enrolled(Enrollment),
    /// The user was already enrolled; nothing changed.
    AlreadyEnrolled(Enrollment),
}

/// Enroll `user` in `course_id`.
///
/// Eligibility is re-evaluated on every call. Two concurrent enrollments
/// that both pass the check are separated by `uq_enrollments_user_course`;
/// the loser surfaces as a 409.
pub async fn enroll(
    pool: &PgPool,
    entitlements: &dyn EntitlementCheck,
    user: &AuthUser,
    course_id: DbId,
) -> AppResult<EnrollOutcome> {
    let check = eligibility::check(pool, entitlements, user, course_id).await?;

    if let Some(existing) = check.enrollment {
        return Ok(EnrollOutcome::AlreadyEnrolled(existing));
    }
    if !check.result.can_enroll {
        tracing::info!(
            user_id = user.user_id,
            course_id,
            reason = ?check.result.reason_code,
            "Enrollment refused",
        );
        return Err(AppError::EnrollmentNotAllowed(Box::new(check.result)));
    }

    let total_lessons = LessonRepo::count_for_course(pool, course_id).await?;
    let total_lessons = i32::try_from(total_lessons)
        .map_err(|_| AppError::InternalError(format!("Lesson count {total_lessons} overflows")))?;

    let enrollment = EnrollmentRepo::create(pool, user.user_id, course_id, total_lessons).await?;

    tracing::info!(
        user_id = user.user_id,
        course_id,
        enrollment_id = enrollment.id,
        total_lessons,
        "User enrolled",
    );

    Ok(EnrollOutcome::Enrolled(enrollment))
}

/// Remove `user`'s enrollment in `course_id` together with its lesson
/// progress. Ledger XP and issued certificates are kept.
pub async fn unenroll(pool: &PgPool, user: &AuthUser, course_id: DbId) -> AppResult<()> {
    let removed = EnrollmentRepo::delete_for_user_course(pool, user.user_id, course_id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "Enrollment for course",
            id: course_id,
        }
        .into());
    }

    tracing::info!(user_id = user.user_id, course_id, "User unenrolled");
    Ok(())
}
