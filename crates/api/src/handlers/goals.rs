//! Handlers for the `/goals` resource.
//!
//! Goals belong to the caller; another user's goal is reported as missing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use learnloop_core::error::CoreError;
use learnloop_core::goals::{
    apply_progress, transition, validate_goal_status, validate_goal_type, GoalAction, GoalState,
    ProgressOutcome, STATUS_EXPIRED,
};
use learnloop_core::types::DbId;
use learnloop_db::models::goal::{CreateGoal, Goal, UpdateGoal};
use learnloop_db::repositories::GoalRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::middleware::validated_json::ValidatedJson;
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /goals`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub goal_type: String,
    #[validate(range(min = 1))]
    pub target_value: i32,
    #[validate(length(min = 1, max = 50))]
    pub unit: String,
    pub due_date: Option<NaiveDate>,
}

/// Request body for `PUT /goals/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub target_value: Option<i32>,
    pub due_date: Option<NaiveDate>,
}

/// Request body for `POST /goals/{id}/progress`.
#[derive(Debug, Deserialize, Validate)]
pub struct GoalProgressRequest {
    #[validate(range(min = 1))]
    pub amount: i32,
}

/// Request body for `POST /goals/{id}/status`.
#[derive(Debug, Deserialize, Validate)]
pub struct GoalStatusRequest {
    pub action: GoalAction,
}

/// Response of `DELETE /goals/{id}`.
#[derive(Debug, Serialize)]
pub struct DeletedGoal {
    pub id: DbId,
    pub deleted: bool,
}

fn goal_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Goal", id })
}

async fn load_goal(state: &AppState, user_id: DbId, id: DbId) -> AppResult<Goal> {
    GoalRepo::find_for_user(&state.pool, user_id, id)
        .await?
        .ok_or_else(|| goal_not_found(id))
}

/// GET /api/goals?status=
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Goal>>>> {
    let status = params.status.as_deref().map(str::to_ascii_lowercase);
    if let Some(s) = &status {
        validate_goal_status(s).map_err(CoreError::Validation)?;
    }
    let goals = GoalRepo::list_for_user(&state.pool, user.user_id, status.as_deref()).await?;
    Ok(Json(DataResponse::new(goals)))
}

/// POST /api/goals
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateGoalRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Goal>>)> {
    let goal_type = input.goal_type.to_ascii_lowercase();
    validate_goal_type(&goal_type).map_err(CoreError::Validation)?;

    let goal = GoalRepo::create(
        &state.pool,
        &CreateGoal {
            user_id: user.user_id,
            title: input.title,
            description: input.description,
            goal_type,
            target_value: input.target_value,
            unit: input.unit,
            due_date: input.due_date,
        },
    )
    .await?;

    tracing::info!(user_id = user.user_id, goal_id = goal.id, "Goal created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(goal))))
}

/// GET /api/goals/{id}
pub async fn get_by_id(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Goal>>> {
    let goal = load_goal(&state, user.user_id, id).await?;
    Ok(Json(DataResponse::new(goal)))
}

/// PUT /api/goals/{id}
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateGoalRequest>,
) -> AppResult<Json<DataResponse<Goal>>> {
    let update = UpdateGoal {
        title: input.title,
        description: input.description,
        target_value: input.target_value,
        due_date: input.due_date,
    };
    let goal = GoalRepo::update(&state.pool, user.user_id, id, &update)
        .await?
        .ok_or_else(|| goal_not_found(id))?;
    Ok(Json(DataResponse::new(goal)))
}

/// DELETE /api/goals/{id}
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletedGoal>>> {
    if !GoalRepo::delete(&state.pool, user.user_id, id).await? {
        return Err(goal_not_found(id));
    }
    Ok(Json(DataResponse::new(DeletedGoal { id, deleted: true })))
}

/// POST /api/goals/{id}/progress
///
/// The goal row is locked while the increment is applied, so concurrent
/// increments all count. Past its due date an active goal is marked expired
/// and the increment is refused with 409.
pub async fn record_progress(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<GoalProgressRequest>,
) -> AppResult<Json<DataResponse<Goal>>> {
    let mut tx = state.pool.begin().await?;
    let goal = GoalRepo::lock_for_user(&mut *tx, user.user_id, id)
        .await?
        .ok_or_else(|| goal_not_found(id))?;
    let current = GoalState {
        status: &goal.status,
        current_value: goal.current_value,
        target_value: goal.target_value,
        streak_count: goal.streak_count,
        due_date: goal.due_date,
    };

    let outcome = apply_progress(&current, input.amount, Utc::now().date_naive())
        .map_err(CoreError::Conflict)?;

    match outcome {
        ProgressOutcome::Expired => {
            GoalRepo::set_status(&mut *tx, user.user_id, id, STATUS_EXPIRED).await?;
            tx.commit().await?;
            tracing::info!(user_id = user.user_id, goal_id = id, "Goal expired");
            Err(AppError::Core(CoreError::Conflict(
                "Goal is past its due date and has expired".into(),
            )))
        }
        ProgressOutcome::Advanced {
            current_value,
            completed,
            streak_count,
        } => {
            let updated = GoalRepo::record_progress(
                &mut *tx,
                user.user_id,
                id,
                current_value,
                completed,
                streak_count,
            )
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict("Goal is no longer active".into()))
            })?;
            tx.commit().await?;
            if completed {
                tracing::info!(user_id = user.user_id, goal_id = id, "Goal completed");
            }
            Ok(Json(DataResponse::new(updated)))
        }
    }
}

/// POST /api/goals/{id}/status
pub async fn change_status(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<GoalStatusRequest>,
) -> AppResult<Json<DataResponse<Goal>>> {
    let mut tx = state.pool.begin().await?;
    let goal = GoalRepo::lock_for_user(&mut *tx, user.user_id, id)
        .await?
        .ok_or_else(|| goal_not_found(id))?;
    let next = transition(&goal.status, input.action).map_err(CoreError::Conflict)?;
    let updated = GoalRepo::set_status(&mut *tx, user.user_id, id, next)
        .await?
        .ok_or_else(|| goal_not_found(id))?;
    tx.commit().await?;
    Ok(Json(DataResponse::new(updated)))
}
