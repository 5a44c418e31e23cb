//! Route definitions for the `/oversight` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::oversight;
use crate::state::AppState;

/// Routes mounted at `/oversight`. Parent, teacher or admin role required.
///
/// ```text
/// GET /students                  -> list_students
/// GET /students/{id}/dashboard   -> student_dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(oversight::list_students))
        .route(
            "/students/{id}/dashboard",
            get(oversight::student_dashboard),
        )
}
