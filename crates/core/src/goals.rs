//! Personal goal lifecycle.
//!
//! Status strings must match the `ck_goals_status` constraint.

use chrono::NaiveDate;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const GOAL_DAILY: &str = "daily";
pub const GOAL_WEEKLY: &str = "weekly";
pub const GOAL_MONTHLY: &str = "monthly";
pub const GOAL_CUSTOM: &str = "custom";

/// All valid goal types.
pub const VALID_GOAL_TYPES: &[&str] = &[GOAL_DAILY, GOAL_WEEKLY, GOAL_MONTHLY, GOAL_CUSTOM];

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_EXPIRED: &str = "expired";
pub const STATUS_PAUSED: &str = "paused";
pub const STATUS_ARCHIVED: &str = "archived";

/// All valid goal statuses.
pub const VALID_GOAL_STATUSES: &[&str] = &[
    STATUS_ACTIVE,
    STATUS_COMPLETED,
    STATUS_EXPIRED,
    STATUS_PAUSED,
    STATUS_ARCHIVED,
];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_goal_type(goal_type: &str) -> Result<(), String> {
    if VALID_GOAL_TYPES.contains(&goal_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid goal type '{goal_type}'. Must be one of: {}",
            VALID_GOAL_TYPES.join(", ")
        ))
    }
}

pub fn validate_goal_status(status: &str) -> Result<(), String> {
    if VALID_GOAL_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid goal status '{status}'. Must be one of: {}",
            VALID_GOAL_STATUSES.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Explicit status changes a user can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalAction {
    Pause,
    Resume,
    Archive,
}

/// Resolve the status a goal moves to when `action` is applied.
pub fn transition(current: &str, action: GoalAction) -> Result<&'static str, String> {
    match (action, current) {
        (GoalAction::Pause, STATUS_ACTIVE) => Ok(STATUS_PAUSED),
        (GoalAction::Resume, STATUS_PAUSED) => Ok(STATUS_ACTIVE),
        (GoalAction::Archive, s) if s != STATUS_ARCHIVED => Ok(STATUS_ARCHIVED),
        (action, s) => Err(format!("Cannot {action:?} a goal that is {s}").to_lowercase()),
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Goal fields progress depends on.
#[derive(Debug, Clone)]
pub struct GoalState<'a> {
    pub status: &'a str,
    pub current_value: i32,
    pub target_value: i32,
    pub streak_count: i32,
    pub due_date: Option<NaiveDate>,
}

/// Result of a progress increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// Progress recorded. `completed` is true when this increment reached
    /// the target.
    Advanced {
        current_value: i32,
        completed: bool,
        streak_count: i32,
    },
    /// The due date has passed; the goal must be marked expired instead.
    Expired,
}

/// Apply a progress increment of `amount` on `today`.
pub fn apply_progress(
    goal: &GoalState<'_>,
    amount: i32,
    today: NaiveDate,
) -> Result<ProgressOutcome, String> {
    if amount <= 0 {
        return Err("Progress amount must be positive".to_string());
    }
    if goal.status != STATUS_ACTIVE {
        return Err(format!(
            "Only active goals accept progress (goal is {})",
            goal.status
        ));
    }
    if matches!(goal.due_date, Some(due) if due < today) {
        return Ok(ProgressOutcome::Expired);
    }

    let current_value = goal.current_value.saturating_add(amount);
    let completed = current_value >= goal.target_value;
    let streak_count = if completed {
        goal.streak_count + 1
    } else {
        goal.streak_count
    };
    Ok(ProgressOutcome::Advanced {
        current_value,
        completed,
        streak_count,
    })
}
