//! Handlers for the public `/gamification` resource.

use axum::extract::State;
use axum::Json;
use learnloop_core::gamification::LevelThreshold;

use crate::response::DataResponse;
use crate::state::AppState;

/// Number of levels listed by `GET /gamification/levels`.
const LISTED_LEVELS: i32 = 20;

/// GET /api/gamification/levels
pub async fn list_levels(State(state): State<AppState>) -> Json<DataResponse<Vec<LevelThreshold>>> {
    Json(DataResponse::new(state.levels.listing(LISTED_LEVELS)))
}
