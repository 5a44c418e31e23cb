//! Handlers for the `/courses` resource: catalog, eligibility, enrollment,
//! lesson completion and certificate issuance.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use learnloop_core::catalog::{CourseFilter, Page, PageWindow, SortDirection, SortField};
use learnloop_core::eligibility::EligibilityResult;
use learnloop_core::error::CoreError;
use learnloop_core::types::DbId;
use learnloop_db::models::certificate::Certificate;
use learnloop_db::models::course::{Course, CourseListItem, CourseRef};
use learnloop_db::models::enrollment::Enrollment;
use learnloop_db::models::lesson::Lesson;
use learnloop_db::models::lesson_progress::LessonProgress;
use learnloop_db::repositories::{CourseRepo, EnrollmentRepo, LessonProgressRepo, LessonRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::certificates::{self, IssueOutcome};
use crate::engine::completion::{self, CompletionOutcome, LessonAttempt};
use crate::engine::eligibility;
use crate::engine::enrollment::{self, EnrollOutcome};
use crate::error::{AppError, AppResult, OperationCode};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::middleware::validated_json::ValidatedJson;
use crate::query::{CatalogParams, IncludeProgressParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One catalog entry, with the caller's enrollment when requested.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(flatten)]
    pub course: CourseListItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<Enrollment>,
}

/// A course with its lessons and prerequisites.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<Lesson>,
    pub prerequisites: Vec<CourseRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<Enrollment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_progress: Option<Vec<LessonProgress>>,
}

/// Response of `POST /courses/{id}/enroll`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    pub enrollment: Enrollment,
    pub already_enrolled: bool,
}

/// Response of `DELETE /courses/{id}/enroll`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnenrollResponse {
    pub course_id: DbId,
    pub unenrolled: bool,
}

/// Request body for `POST /courses/{id}/lessons/{lessonId}/complete`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonRequest {
    #[validate(range(min = 0, max = 100))]
    pub score: Option<i32>,
    /// Seconds spent on the lesson.
    #[serde(default)]
    #[validate(range(min = 0, max = 86_400))]
    pub time_spent: i32,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// GET /api/courses
///
/// Published courses, filtered, sorted and paginated. With
/// `includeProgress=true` and a bearer token each item carries the caller's
/// enrollment.
pub async fn list(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<DataResponse<Page<CatalogItem>>>> {
    let difficulty = params.difficulty.as_deref().map(str::to_ascii_lowercase);
    let filter = CourseFilter::new(
        params.subject.as_deref(),
        difficulty.as_deref(),
        params.is_premium,
        params.search.as_deref(),
    )
    .map_err(CoreError::Validation)?;
    let sort = SortField::parse(params.sort_by.as_deref()).map_err(CoreError::Validation)?;
    let direction =
        SortDirection::parse(params.sort_direction.as_deref()).map_err(CoreError::Validation)?;
    let window = PageWindow::new(params.page, params.page_size);

    let total = CourseRepo::count_catalog(&state.pool, &filter).await?;
    let courses = CourseRepo::list_catalog(&state.pool, &filter, sort, direction, window).await?;

    let mut enrollments: HashMap<DbId, Enrollment> = HashMap::new();
    if let (true, Some(user)) = (params.include_progress, user.as_ref()) {
        let ids: Vec<DbId> = courses.iter().map(|c| c.course.id).collect();
        enrollments = EnrollmentRepo::list_for_user_courses(&state.pool, user.user_id, &ids)
            .await?
            .into_iter()
            .map(|e| (e.course_id, e))
            .collect();
    }

    let items = courses
        .into_iter()
        .map(|course| CatalogItem {
            enrollment: enrollments.remove(&course.course.id),
            course,
        })
        .collect();

    Ok(Json(DataResponse::new(Page::new(items, total, window))))
}

async fn course_detail(
    state: &AppState,
    course: Course,
    user: Option<&AuthUser>,
    include_progress: bool,
) -> AppResult<CourseDetail> {
    let lessons = LessonRepo::list_for_course(&state.pool, course.id).await?;
    let prerequisites = CourseRepo::prerequisites(&state.pool, course.id).await?;

    let mut enrollment = None;
    let mut lesson_progress = None;
    if let (true, Some(user)) = (include_progress, user) {
        enrollment =
            EnrollmentRepo::find_for_user_course(&state.pool, user.user_id, course.id).await?;
        if let Some(e) = &enrollment {
            let rows = LessonProgressRepo::list_for_enrollment(&state.pool, e.id).await?;
            lesson_progress = Some(rows);
        }
    }

    Ok(CourseDetail {
        course,
        lessons,
        prerequisites,
        enrollment,
        lesson_progress,
    })
}

/// GET /api/courses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<DbId>,
    Query(params): Query<IncludeProgressParams>,
) -> AppResult<Json<DataResponse<CourseDetail>>> {
    let course = CourseRepo::find_published(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;
    let detail = course_detail(&state, course, user.as_ref(), params.include_progress).await?;
    Ok(Json(DataResponse::new(detail)))
}

/// GET /api/courses/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(slug): Path<String>,
    Query(params): Query<IncludeProgressParams>,
) -> AppResult<Json<DataResponse<CourseDetail>>> {
    let course = CourseRepo::find_published_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Course with slug {slug} not found")))?;
    let detail = course_detail(&state, course, user.as_ref(), params.include_progress).await?;
    Ok(Json(DataResponse::new(detail)))
}

// ---------------------------------------------------------------------------
// Enrollment
// ---------------------------------------------------------------------------

/// GET /api/courses/{id}/eligibility
pub async fn get_eligibility(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EligibilityResult>>> {
    let check = eligibility::check(&state.pool, state.entitlements.as_ref(), &user, id).await?;
    Ok(Json(DataResponse::new(check.result)))
}

/// POST /api/courses/{id}/enroll
///
/// 201 with the new enrollment, or 200 when the caller was already enrolled.
pub async fn enroll(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<EnrollResponse>>)> {
    let outcome = enrollment::enroll(&state.pool, state.entitlements.as_ref(), &user, id)
        .await
        .operation("ENROLLMENT_FAILED")?;

    let (status, response) = match outcome {
        EnrollOutcome::Enrolled(enrollment) => (
            StatusCode::CREATED,
            EnrollResponse {
                enrollment,
                already_enrolled: false,
            },
        ),
        EnrollOutcome::AlreadyEnrolled(enrollment) => (
            StatusCode::OK,
            EnrollResponse {
                enrollment,
                already_enrolled: true,
            },
        ),
    };
    Ok((status, Json(DataResponse::new(response))))
}

/// DELETE /api/courses/{id}/enroll
pub async fn unenroll(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UnenrollResponse>>> {
    enrollment::unenroll(&state.pool, &user, id)
        .await
        .operation("UNENROLL_FAILED")?;
    Ok(Json(DataResponse::new(UnenrollResponse {
        course_id: id,
        unenrolled: true,
    })))
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// POST /api/courses/{id}/lessons/{lesson_id}/complete
///
/// A score below the lesson's requirement is a normal response with
/// `passed: false`, not an error.
pub async fn complete_lesson(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((course_id, lesson_id)): Path<(DbId, DbId)>,
    ValidatedJson(input): ValidatedJson<CompleteLessonRequest>,
) -> AppResult<Json<DataResponse<CompletionOutcome>>> {
    let outcome = completion::complete_lesson(
        &state.pool,
        &state.levels,
        &user,
        course_id,
        lesson_id,
        LessonAttempt {
            score: input.score,
            time_spent_secs: input.time_spent,
        },
    )
    .await?;
    Ok(Json(DataResponse::new(outcome)))
}

/// POST /api/courses/{id}/certificate
///
/// 201 when this call issued the certificate, 200 when it already existed.
pub async fn issue_certificate(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Certificate>>)> {
    let (status, certificate) = match certificates::issue(&state.pool, &user, id).await? {
        IssueOutcome::Issued(c) => (StatusCode::CREATED, c),
        IssueOutcome::Existing(c) => (StatusCode::OK, c),
    };
    Ok((status, Json(DataResponse::new(certificate))))
}
