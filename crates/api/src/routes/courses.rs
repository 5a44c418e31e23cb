//! Route definitions for the `/courses` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::courses;
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET    /                                     -> list (optional auth)
/// GET    /slug/{slug}                          -> get_by_slug
/// GET    /{id}                                 -> get_by_id
/// GET    /{id}/eligibility                     -> get_eligibility
/// POST   /{id}/enroll                          -> enroll
/// DELETE /{id}/enroll                          -> unenroll
/// POST   /{id}/lessons/{lesson_id}/complete    -> complete_lesson
/// POST   /{id}/certificate                     -> issue_certificate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list))
        .route("/slug/{slug}", get(courses::get_by_slug))
        .route("/{id}", get(courses::get_by_id))
        .route("/{id}/eligibility", get(courses::get_eligibility))
        .route(
            "/{id}/enroll",
            post(courses::enroll).delete(courses::unenroll),
        )
        .route(
            "/{id}/lessons/{lesson_id}/complete",
            post(courses::complete_lesson),
        )
        .route("/{id}/certificate", post(courses::issue_certificate))
}
