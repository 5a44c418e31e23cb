use axum::routing::get;
use axum::Router;

use crate::handlers::gamification;
use crate::state::AppState;

/// Routes mounted at `/gamification`.
pub fn router() -> Router<AppState> {
    Router::new().route("/levels", get(gamification::list_levels))
}
