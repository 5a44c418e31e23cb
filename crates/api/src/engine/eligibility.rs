//! Loads eligibility facts and runs the enrollment decision.

use learnloop_core::eligibility::{
    evaluate, EligibilityFacts, EligibilityResult, EntitlementCheck, PrerequisiteStatus,
};
use learnloop_core::error::CoreError;
use learnloop_core::types::DbId;
use learnloop_db::models::course::Course;
use learnloop_db::models::enrollment::Enrollment;
use learnloop_db::repositories::{CourseRepo, EnrollmentRepo};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// Outcome of an eligibility check along with what was loaded for it.
#[derive(Debug)]
pub struct EligibilityCheck {
    pub course: Course,
    pub enrollment: Option<Enrollment>,
    pub result: EligibilityResult,
}

/// Check whether `user` may enroll in `course_id`.
///
/// Unknown and unpublished courses are `NotFound`. An existing enrollment
/// short-circuits the remaining checks.
pub async fn check(
    pool: &PgPool,
    entitlements: &dyn EntitlementCheck,
    user: &AuthUser,
    course_id: DbId,
) -> AppResult<EligibilityCheck> {
    let course = CourseRepo::find_published(pool, course_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        })?;

    let enrollment = EnrollmentRepo::find_for_user_course(pool, user.user_id, course_id).await?;

    let facts = if enrollment.is_some() {
        EligibilityFacts {
            course_is_premium: course.is_premium,
            already_enrolled: true,
            prerequisites: Vec::new(),
            has_premium_access: entitlements.has_premium_access(user.user_id),
            free_courses_enrolled: 0,
        }
    } else {
        let prerequisites = CourseRepo::prerequisite_progress(pool, course_id, user.user_id)
            .await?
            .into_iter()
            .map(|p| PrerequisiteStatus {
                course_id: p.course_id,
                title: p.title,
                completed: p.completed,
            })
            .collect();
        EligibilityFacts {
            course_is_premium: course.is_premium,
            already_enrolled: false,
            prerequisites,
            has_premium_access: entitlements.has_premium_access(user.user_id),
            free_courses_enrolled: EnrollmentRepo::count_free_for_user(pool, user.user_id).await?,
        }
    };

    Ok(EligibilityCheck {
        course,
        enrollment,
        result: evaluate(&facts),
    })
}
