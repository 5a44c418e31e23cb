//! Handlers for the `/certificates` resource.

use axum::extract::{Path, State};
use axum::Json;
use learnloop_db::models::certificate::Certificate;
use learnloop_db::repositories::CertificateRepo;

use crate::engine::certificates;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/certificates/user
pub async fn list_mine(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Certificate>>>> {
    let certs = CertificateRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse::new(certs)))
}

/// GET /api/certificates/verify/{code}
///
/// Public. Anyone holding a verification code can confirm the certificate.
pub async fn verify(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<DataResponse<Certificate>>> {
    let cert = certificates::verify(&state.pool, &code).await?;
    Ok(Json(DataResponse::new(cert)))
}
