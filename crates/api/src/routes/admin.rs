//! Route definitions for the `/admin` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Admin role required.
///
/// ```text
/// POST /courses                 -> create_course
/// POST /courses/{id}/lessons    -> add_lesson
/// POST /courses/{id}/publish    -> publish_course
/// POST /student-links           -> create_student_link
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", post(admin::create_course))
        .route("/courses/{id}/lessons", post(admin::add_lesson))
        .route("/courses/{id}/publish", post(admin::publish_course))
        .route("/student-links", post(admin::create_student_link))
}
