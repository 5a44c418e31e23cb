//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`. All require authentication.
///
/// ```text
/// GET /me            -> me
/// GET /dashboard     -> get_dashboard
/// GET /stats         -> get_stats
/// GET /achievements  -> list_achievements
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::me))
        .route("/dashboard", get(users::get_dashboard))
        .route("/stats", get(users::get_stats))
        .route("/achievements", get(users::list_achievements))
}
