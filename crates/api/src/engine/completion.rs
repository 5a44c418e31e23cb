//! Lesson completion: pass/fail policy, first-pass credit, course completion.

use chrono::Utc;
use learnloop_core::course::validate_score;
use learnloop_core::error::CoreError;
use learnloop_core::gamification::LevelTable;
use learnloop_core::progression::{
    check_pass, increment_completed, is_course_complete, progress_pct, PassDecision,
    validate_time_spent, ENROLLMENT_ACTIVE, ENROLLMENT_COMPLETED,
};
use learnloop_core::types::DbId;
use learnloop_db::models::lesson::NextLesson;
use learnloop_db::repositories::{EnrollmentRepo, LessonProgressRepo, LessonRepo};
use serde::Serialize;
use sqlx::PgPool;

use super::ledger::{self, AchievementView, LedgerCredit};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// A lesson attempt as submitted by the client.
#[derive(Debug, Clone, Copy)]
pub struct LessonAttempt {
    pub score: Option<i32>,
    pub time_spent_secs: i32,
}

/// Enrollment progress after the attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub lessons_completed: i32,
    pub total_lessons: i32,
    pub progress_pct: u8,
    pub average_score: Option<f64>,
}

/// Response of `POST /courses/{id}/lessons/{lessonId}/complete`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub passed: bool,
    pub xp_awarded: i32,
    pub new_level: Option<i32>,
    pub leveled_up: bool,
    pub next_lesson: Option<NextLesson>,
    pub course_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_score: Option<i32>,
    pub achievements_unlocked: Vec<AchievementView>,
    pub progress: ProgressSummary,
}

/// Record a lesson attempt by `user`.
///
/// A failed attempt changes nothing and can be retried freely. A passing
/// attempt runs in one transaction: the enrollment row is locked, the
/// progress upsert decides whether this is the first pass, and only a first
/// pass adds to `lessons_completed` and XP. Completion to COMPLETED is a
/// guarded update so it happens exactly once.
pub async fn complete_lesson(
    pool: &PgPool,
    levels: &LevelTable,
    user: &AuthUser,
    course_id: DbId,
    lesson_id: DbId,
    attempt: LessonAttempt,
) -> AppResult<CompletionOutcome> {
    if let Some(score) = attempt.score {
        validate_score(score).map_err(CoreError::Validation)?;
    }
    validate_time_spent(attempt.time_spent_secs).map_err(CoreError::Validation)?;

    let enrollment = EnrollmentRepo::find_for_user_course(pool, user.user_id, course_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Enrollment for course",
            id: course_id,
        })?;

    let lesson = LessonRepo::find_in_course(pool, course_id, lesson_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lesson",
            id: lesson_id,
        })?;

    if let PassDecision::Failed { minimum_score } = check_pass(lesson.required_score, attempt.score)
    {
        let mut conn = pool.acquire().await?;
        EnrollmentRepo::touch(&mut conn, enrollment.id).await?;
        tracing::debug!(
            user_id = user.user_id,
            lesson_id,
            score = ?attempt.score,
            minimum_score,
            "Lesson attempt below required score",
        );
        return Ok(CompletionOutcome {
            passed: false,
            xp_awarded: 0,
            new_level: None,
            leveled_up: false,
            next_lesson: None,
            course_completed: enrollment.status == ENROLLMENT_COMPLETED,
            minimum_score: Some(minimum_score),
            achievements_unlocked: Vec::new(),
            progress: ProgressSummary {
                lessons_completed: enrollment.lessons_completed,
                total_lessons: enrollment.total_lessons,
                progress_pct: progress_pct(enrollment.lessons_completed, enrollment.total_lessons),
                average_score: enrollment.average_score,
            },
        });
    }

    let mut tx = pool.begin().await?;

    let locked = EnrollmentRepo::touch(&mut *tx, enrollment.id).await?;
    let record = LessonProgressRepo::upsert_pass(
        &mut *tx,
        locked.id,
        lesson.id,
        attempt.score,
        attempt.time_spent_secs,
    )
    .await?;

    let xp_awarded = if record.first_pass { lesson.xp_reward } else { 0 };
    if record.first_pass {
        let completed = increment_completed(locked.lessons_completed, locked.total_lessons);
        EnrollmentRepo::record_first_pass(&mut *tx, locked.id, completed, xp_awarded).await?;
    }
    let mut updated = EnrollmentRepo::refresh_average_score(&mut *tx, locked.id).await?;

    let mut newly_completed = false;
    if updated.status == ENROLLMENT_ACTIVE
        && is_course_complete(updated.lessons_completed, updated.total_lessons)
    {
        if let Some(done) = EnrollmentRepo::mark_completed(&mut *tx, locked.id).await? {
            updated = done;
            newly_completed = true;
        }
    }

    let ledger = ledger::credit(
        &mut *tx,
        levels,
        user.user_id,
        LedgerCredit {
            xp: xp_awarded,
            first_pass: record.first_pass,
            perfect_score: attempt.score == Some(100),
            course_completed: newly_completed,
            today: Utc::now().date_naive(),
        },
    )
    .await?;

    tx.commit().await?;

    if record.first_pass {
        tracing::info!(
            user_id = user.user_id,
            course_id,
            lesson_id,
            xp_awarded,
            lessons_completed = updated.lessons_completed,
            total_lessons = updated.total_lessons,
            "Lesson passed",
        );
    }
    if newly_completed {
        tracing::info!(
            user_id = user.user_id,
            course_id,
            enrollment_id = updated.id,
            "Course completed",
        );
    }

    let next_lesson = LessonRepo::next_after(pool, course_id, lesson.lesson_order).await?;
    let leveled_up = ledger.award.leveled_up();

    Ok(CompletionOutcome {
        passed: true,
        xp_awarded,
        new_level: leveled_up.then_some(ledger.award.new_level),
        leveled_up,
        next_lesson,
        course_completed: updated.status == ENROLLMENT_COMPLETED,
        minimum_score: None,
        achievements_unlocked: ledger
            .unlocked
            .into_iter()
            .map(AchievementView::unlocked_now)
            .collect(),
        progress: ProgressSummary {
            lessons_completed: updated.lessons_completed,
            total_lessons: updated.total_lessons,
            progress_pct: progress_pct(updated.lessons_completed, updated.total_lessons),
            average_score: updated.average_score,
        },
    })
}
