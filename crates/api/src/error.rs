use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use learnloop_core::eligibility::EligibilityResult;
use learnloop_core::error::CoreError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the `{ success: false, error }`
/// envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `learnloop_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message (malformed body, failed
    /// field validation).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A lookup by something other than an id found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The eligibility checker refused an enrollment.
    #[error("Enrollment not allowed")]
    EnrollmentNotAllowed(Box<EligibilityResult>),

    /// An error raised while performing a named operation. Server-side
    /// failures report the operation's code instead of `INTERNAL_ERROR`;
    /// client errors pass through unchanged.
    #[error("{code}: {source}")]
    Operation {
        code: &'static str,
        #[source]
        source: Box<AppError>,
    },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Tag the error of a fallible operation with an operation-specific code.
pub trait OperationCode<T> {
    fn operation(self, code: &'static str) -> AppResult<T>;
}

impl<T> OperationCode<T> for AppResult<T> {
    fn operation(self, code: &'static str) -> AppResult<T> {
        self.map_err(|err| AppError::Operation {
            code,
            source: Box::new(err),
        })
    }
}

/// Status, code, message and optional details of an error response.
struct ErrorParts {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Value>,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl AppError {
    fn parts(&self) -> ErrorParts {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => ErrorParts::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    ErrorParts::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => {
                    ErrorParts::new(StatusCode::CONFLICT, "CONFLICT", msg.clone())
                }
                CoreError::Unauthorized(msg) => ErrorParts::new(
                    StatusCode::UNAUTHORIZED,
                    "AUTHENTICATION_ERROR",
                    msg.clone(),
                ),
                CoreError::Forbidden(msg) => ErrorParts::new(
                    StatusCode::FORBIDDEN,
                    "AUTHORIZATION_ERROR",
                    msg.clone(),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    ErrorParts::internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                ErrorParts::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::NotFound(msg) => {
                ErrorParts::new(StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone())
            }
            AppError::EnrollmentNotAllowed(result) => {
                let message = result
                    .reason
                    .map(|r| r.message())
                    .unwrap_or("Enrollment not allowed");
                let mut parts =
                    ErrorParts::new(StatusCode::FORBIDDEN, "ENROLLMENT_NOT_ALLOWED", message);
                parts.details = serde_json::to_value(result.as_ref()).ok();
                parts
            }
            AppError::Operation { code, source } => {
                let mut parts = source.parts();
                if parts.status == StatusCode::INTERNAL_SERVER_ERROR {
                    parts.code = code;
                }
                parts
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorParts::internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let ErrorParts {
            status,
            code,
            message,
            details,
        } = self.parts();

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        let body = json!({
            "success": false,
            "error": error,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Foreign key violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => {
            ErrorParts::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            match db_err.code().as_deref() {
                // PostgreSQL unique constraint violation
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    if constraint.starts_with("uq_") {
                        return ErrorParts::new(
                            StatusCode::CONFLICT,
                            "CONFLICT",
                            format!("Duplicate value violates unique constraint: {constraint}"),
                        );
                    }
                }
                // PostgreSQL foreign key violation
                Some("23503") => {
                    return ErrorParts::new(
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        "Referenced record does not exist",
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            ErrorParts::internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorParts::internal()
        }
    }
}
