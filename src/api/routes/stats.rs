// Statistics Routes

use crate::api::{models::response::StatsResponse, state::AppState};
use axum::{extract::State, Json};
use std::sync::Arc;

/// Get the number of stored observations
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Observation count, -1 if the store failed", body = StatsResponse)
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        total_requests: state.engine.count_all().await,
    })
}
