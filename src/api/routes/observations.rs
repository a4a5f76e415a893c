// Observation Routes
// Write path entry point for the capturing server

use crate::api::{
    config::Permission,
    middleware::auth::{check_permission, AuthExtension},
    models::error::{ApiError, ApiErrorResponse},
    state::AppState,
};
use crate::fingerprint::CapturedRequest;
use crate::ingest::IngestOutcome;
use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;

/// Submit a captured request
///
/// Runs admission filtering, user-agent dedup and insertion. Rejected and
/// duplicate captures are not errors.
#[utoipa::path(
    post,
    path = "/api/v1/observations",
    tag = "observations",
    request_body = CapturedRequest,
    responses(
        (status = 201, description = "Observation stored", body = IngestOutcome),
        (status = 200, description = "Capture rejected or already recorded", body = IngestOutcome),
        (status = 403, description = "Key lacks ingest permission", body = ApiErrorResponse),
        (status = 503, description = "Record store unavailable", body = ApiErrorResponse)
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn submit_observation(
    State(state): State<Arc<AppState>>,
    auth: Option<Extension<AuthExtension>>,
    Json(capture): Json<CapturedRequest>,
) -> Result<(StatusCode, Json<IngestOutcome>), ApiError> {
    if state.config.requires_auth() {
        let Extension(auth) =
            auth.ok_or_else(|| ApiError::Unauthorized("Missing X-API-Key header".to_string()))?;
        check_permission(Permission::Ingest, auth.permission)?;
    }

    match state.ingestor.record(&capture).await {
        IngestOutcome::Failed { error } => Err(ApiError::ServiceUnavailable(error)),
        outcome @ IngestOutcome::Stored { .. } => Ok((StatusCode::CREATED, Json(outcome))),
        outcome => Ok((StatusCode::OK, Json(outcome))),
    }
}
