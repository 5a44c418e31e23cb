//! Shared response envelope types for API handlers.
//!
//! Every successful response uses a `{ "success": true, "data": ... }`
//! envelope. Errors use the matching `{ "success": false, "error": ... }`
//! shape produced by [`crate::error::AppError`].

use serde::Serialize;

/// Standard success envelope.
///
/// ```ignore
/// Ok(Json(DataResponse::new(items)))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
