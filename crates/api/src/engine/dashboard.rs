//! Student dashboards and guardian oversight.

use learnloop_core::error::CoreError;
use learnloop_core::gamification::LevelTable;
use learnloop_core::goals::STATUS_ACTIVE;
use learnloop_core::progression::{progress_pct, ENROLLMENT_ACTIVE};
use learnloop_core::roles::{ROLE_ADMIN, ROLE_STUDENT};
use learnloop_core::types::DbId;
use learnloop_db::models::enrollment::EnrollmentWithCourse;
use learnloop_db::models::goal::Goal;
use learnloop_db::repositories::{
    CertificateRepo, EnrollmentRepo, GoalRepo, StudentLinkRepo, UserRepo,
};
use serde::Serialize;
use sqlx::PgPool;

use super::ledger::{self, AchievementView, StatsView};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// How many unlocks the dashboard shows.
const RECENT_ACHIEVEMENTS: usize = 5;

/// An enrollment with its completion percentage.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    #[serde(flatten)]
    pub enrollment: EnrollmentWithCourse,
    pub progress_pct: u8,
}

impl From<EnrollmentWithCourse> for CourseProgress {
    fn from(enrollment: EnrollmentWithCourse) -> Self {
        let progress_pct = progress_pct(
            enrollment.enrollment.lessons_completed,
            enrollment.enrollment.total_lessons,
        );
        Self {
            enrollment,
            progress_pct,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user_id: DbId,
    pub stats: StatsView,
    pub in_progress: Vec<CourseProgress>,
    pub completed: Vec<CourseProgress>,
    pub recent_achievements: Vec<AchievementView>,
    pub active_goals: Vec<Goal>,
    pub certificate_count: i64,
}

/// Assemble the dashboard of `user_id`.
pub async fn build(pool: &PgPool, levels: &LevelTable, user_id: DbId) -> AppResult<Dashboard> {
    let stats = ledger::stats_view(pool, levels, user_id).await?;

    let (in_progress, completed): (Vec<CourseProgress>, Vec<CourseProgress>) =
        EnrollmentRepo::list_for_user(pool, user_id, None)
            .await?
            .into_iter()
            .map(CourseProgress::from)
            .partition(|c| c.enrollment.enrollment.status == ENROLLMENT_ACTIVE);

    Ok(Dashboard {
        user_id,
        stats,
        in_progress,
        completed,
        recent_achievements: ledger::recent_achievements(pool, user_id, RECENT_ACHIEVEMENTS)
            .await?,
        active_goals: GoalRepo::list_for_user(pool, user_id, Some(STATUS_ACTIVE)).await?,
        certificate_count: CertificateRepo::count_for_user(pool, user_id).await?,
    })
}

/// A student's dashboard as seen by `viewer`.
///
/// Admins may read any student. Parents and teachers need a link to the
/// student; an unlinked student is 403 whether or not the id exists.
pub async fn student_dashboard(
    pool: &PgPool,
    levels: &LevelTable,
    viewer: &AuthUser,
    student_id: DbId,
) -> AppResult<Dashboard> {
    if viewer.role != ROLE_ADMIN
        && !StudentLinkRepo::exists(pool, viewer.user_id, student_id).await?
    {
        tracing::warn!(
            guardian_id = viewer.user_id,
            student_id,
            "Oversight denied for unlinked student",
        );
        return Err(CoreError::Forbidden("Student is not linked to this account".into()).into());
    }

    let student = UserRepo::find_by_id(pool, student_id)
        .await?
        .filter(|u| u.role == ROLE_STUDENT)
        .ok_or(CoreError::NotFound {
            entity: "Student",
            id: student_id,
        })?;

    build(pool, levels, student.id).await
}
