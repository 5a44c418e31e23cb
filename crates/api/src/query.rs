//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for `GET /courses`.
///
/// Values are normalised in `learnloop_core::catalog` before reaching SQL.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogParams {
    pub subject: Option<String>,
    pub difficulty: Option<String>,
    pub is_premium: Option<bool>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    #[serde(default)]
    pub include_progress: bool,
}

/// `?includeProgress=` flag for single-course reads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeProgressParams {
    #[serde(default)]
    pub include_progress: bool,
}

/// `?status=` filter for list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<String>,
}
