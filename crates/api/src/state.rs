use std::sync::Arc;

use learnloop_core::eligibility::EntitlementCheck;
use learnloop_core::gamification::LevelTable;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: learnloop_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Premium entitlement source consulted by the eligibility checker.
    pub entitlements: Arc<dyn EntitlementCheck>,
    /// XP level curve used by the gamification ledger.
    pub levels: Arc<LevelTable>,
}
