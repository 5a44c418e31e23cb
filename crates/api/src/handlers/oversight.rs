//! Handlers for the `/oversight` resource (parents, teachers, admins).

use axum::extract::{Path, State};
use axum::Json;
use learnloop_core::types::DbId;
use learnloop_db::models::student_link::LinkedStudent;
use learnloop_db::repositories::StudentLinkRepo;

use crate::engine::dashboard::{self, Dashboard};
use crate::error::AppResult;
use crate::middleware::rbac::RequireGuardian;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/oversight/students
///
/// Students linked to the caller with headline figures.
pub async fn list_students(
    RequireGuardian(user): RequireGuardian,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<LinkedStudent>>>> {
    let students = StudentLinkRepo::list_students(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse::new(students)))
}

/// GET /api/oversight/students/{id}/dashboard
pub async fn student_dashboard(
    RequireGuardian(user): RequireGuardian,
    State(state): State<AppState>,
    Path(student_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let view = dashboard::student_dashboard(&state.pool, &state.levels, &user, student_id).await?;
    Ok(Json(DataResponse::new(view)))
}
