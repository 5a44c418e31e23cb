//! Handlers for the `/users` resource: profile, dashboard and ledger reads.

use axum::extract::State;
use axum::Json;
use learnloop_core::error::CoreError;
use learnloop_db::models::user::UserResponse;
use learnloop_db::repositories::UserRepo;

use crate::engine::dashboard::{self, Dashboard};
use crate::engine::ledger::{self, AchievementView, StatsView};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/users/me
pub async fn me(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let found = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse::new(UserResponse::from(found))))
}

/// GET /api/users/dashboard
pub async fn get_dashboard(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let view = dashboard::build(&state.pool, &state.levels, user.user_id).await?;
    Ok(Json(DataResponse::new(view)))
}

/// GET /api/users/stats
pub async fn get_stats(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<StatsView>>> {
    let stats = ledger::stats_view(&state.pool, &state.levels, user.user_id).await?;
    Ok(Json(DataResponse::new(stats)))
}

/// GET /api/users/achievements
///
/// The full achievement catalog with the caller's unlock state.
pub async fn list_achievements(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AchievementView>>>> {
    let catalog = ledger::achievement_catalog(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse::new(catalog)))
}
