//! Handlers for the `/admin` resource: course authoring and oversight links.
//!
//! Authoring is creation only. Once published a course no longer accepts
//! lessons.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use learnloop_core::course::{
    slugify, validate_difficulty, validate_lesson_type, validate_score, validate_slug,
};
use learnloop_core::error::CoreError;
use learnloop_core::roles::{is_guardian_role, ROLE_STUDENT};
use learnloop_core::types::DbId;
use learnloop_db::models::course::{Course, CreateCourse};
use learnloop_db::models::lesson::{CreateLesson, Lesson};
use learnloop_db::models::student_link::StudentLink;
use learnloop_db::repositories::{CourseRepo, LessonRepo, StudentLinkRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::middleware::validated_json::ValidatedJson;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/courses`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Derived from the title when absent.
    pub slug: Option<String>,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    pub difficulty: String,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub prerequisite_course_ids: Vec<DbId>,
}

/// Request body for `POST /admin/courses/{id}/lessons`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    #[serde(rename = "type")]
    pub lesson_type: String,
    /// Appended after the last lesson when absent.
    #[validate(range(min = 1))]
    pub order: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub xp_reward: i32,
    pub required_score: Option<i32>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    #[validate(url)]
    pub content_url: Option<String>,
}

/// Request body for `POST /admin/student-links`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentLinkRequest {
    pub guardian_id: DbId,
    pub student_id: DbId,
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

/// POST /api/admin/courses
///
/// Create a draft course with its prerequisites.
pub async fn create_course(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateCourseRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Course>>)> {
    let slug = input.slug.unwrap_or_else(|| slugify(&input.title));
    validate_slug(&slug).map_err(CoreError::Validation)?;
    let difficulty = input.difficulty.to_ascii_lowercase();
    validate_difficulty(&difficulty).map_err(CoreError::Validation)?;

    let mut prerequisite_ids = input.prerequisite_course_ids;
    prerequisite_ids.sort_unstable();
    prerequisite_ids.dedup();
    let found = CourseRepo::count_existing(&state.pool, &prerequisite_ids).await?;
    if found != prerequisite_ids.len() as i64 {
        return Err(AppError::Core(CoreError::Validation(
            "One or more prerequisite courses do not exist".into(),
        )));
    }

    let course = CourseRepo::create(
        &state.pool,
        &CreateCourse {
            title: input.title,
            slug,
            description: input.description,
            subject: input.subject,
            difficulty,
            is_premium: input.is_premium,
            created_by: Some(admin.user_id),
        },
        &prerequisite_ids,
    )
    .await?;

    tracing::info!(
        admin_id = admin.user_id,
        course_id = course.id,
        prerequisites = prerequisite_ids.len(),
        "Course created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(course))))
}

/// POST /api/admin/courses/{id}/lessons
pub async fn add_lesson(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<CreateLessonRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Lesson>>)> {
    let lesson_type = input.lesson_type.to_ascii_lowercase();
    validate_lesson_type(&lesson_type).map_err(CoreError::Validation)?;
    if let Some(required) = input.required_score {
        validate_score(required).map_err(CoreError::Validation)?;
    }

    let course = CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }))?;
    if course.is_published {
        return Err(AppError::Core(CoreError::Conflict(
            "Lessons cannot be added to a published course".into(),
        )));
    }

    let lesson_order = match input.order {
        Some(order) => order,
        None => LessonRepo::next_order(&state.pool, course_id).await?,
    };

    let lesson = LessonRepo::create(
        &state.pool,
        &CreateLesson {
            course_id,
            title: input.title,
            description: input.description,
            lesson_type,
            lesson_order,
            xp_reward: input.xp_reward,
            required_score: input.required_score,
            duration_minutes: input.duration_minutes,
            content_url: input.content_url,
        },
    )
    .await?;

    tracing::info!(
        admin_id = admin.user_id,
        course_id,
        lesson_id = lesson.id,
        lesson_order,
        "Lesson added",
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(lesson))))
}

/// POST /api/admin/courses/{id}/publish
///
/// Requires at least one lesson. Publishing twice is a conflict.
pub async fn publish_course(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Course>>> {
    let course = CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }))?;
    if course.is_published {
        return Err(AppError::Core(CoreError::Conflict(
            "Course is already published".into(),
        )));
    }
    if LessonRepo::count_for_course(&state.pool, course_id).await? == 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "A course needs at least one lesson before it can be published".into(),
        )));
    }

    let published = CourseRepo::publish(&state.pool, course_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict("Course is already published".into()))
        })?;

    tracing::info!(admin_id = admin.user_id, course_id, "Course published");
    Ok(Json(DataResponse::new(published)))
}

// ---------------------------------------------------------------------------
// Oversight links
// ---------------------------------------------------------------------------

/// POST /api/admin/student-links
///
/// The relationship is taken from the guardian's role.
pub async fn create_student_link(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateStudentLinkRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<StudentLink>>)> {
    let guardian = UserRepo::find_by_id(&state.pool, input.guardian_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.guardian_id,
        }))?;
    if !is_guardian_role(&guardian.role) {
        return Err(AppError::Core(CoreError::Validation(
            "Guardian must have the parent or teacher role".into(),
        )));
    }

    let student = UserRepo::find_by_id(&state.pool, input.student_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.student_id,
        }))?;
    if student.role != ROLE_STUDENT {
        return Err(AppError::Core(CoreError::Validation(
            "Only students can be linked to a guardian".into(),
        )));
    }

    let link =
        StudentLinkRepo::create(&state.pool, guardian.id, student.id, &guardian.role).await?;

    tracing::info!(
        admin_id = admin.user_id,
        guardian_id = guardian.id,
        student_id = student.id,
        relationship = %link.relationship,
        "Student linked",
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(link))))
}
