//! Route definitions for the `/certificates` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::certificates;
use crate::state::AppState;

/// Routes mounted at `/certificates`.
///
/// ```text
/// GET /user            -> list_mine (requires auth)
/// GET /verify/{code}   -> verify (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", get(certificates::list_mine))
        .route("/verify/{code}", get(certificates::verify))
}
