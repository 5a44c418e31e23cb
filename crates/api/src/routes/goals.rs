//! Route definitions for the `/goals` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::goals;
use crate::state::AppState;

/// Routes mounted at `/goals`. All require authentication.
///
/// ```text
/// GET    /                -> list (?status=)
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// POST   /{id}/progress   -> record_progress
/// POST   /{id}/status     -> change_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(goals::list).post(goals::create))
        .route(
            "/{id}",
            get(goals::get_by_id)
                .put(goals::update)
                .delete(goals::delete),
        )
        .route("/{id}/progress", post(goals::record_progress))
        .route("/{id}/status", post(goals::change_status))
}
