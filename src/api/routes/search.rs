// Lookup Routes
// Cross-tabulate one fingerprint or user-agent against the other dimensions

use crate::api::{
    models::{error::ApiError, error::ApiErrorResponse, request::SearchQuery},
    state::AppState,
};
use crate::correlation::Correlation;
use crate::fingerprint::Dimension;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

/// Look up by TLS (JA3) fingerprint
#[utoipa::path(
    get,
    path = "/api/v1/search/ja3",
    tag = "search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Counts of co-occurring values", body = Correlation)
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn search_ja3(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Correlation> {
    Json(state.engine.by_tls_fingerprint(&query.by).await)
}

/// Look up by HTTP/2 fingerprint
#[utoipa::path(
    get,
    path = "/api/v1/search/h2",
    tag = "search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Counts of co-occurring values", body = Correlation)
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn search_h2(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Correlation> {
    Json(state.engine.by_http2_fingerprint(&query.by).await)
}

/// Look up by composite (PeetPrint) fingerprint
#[utoipa::path(
    get,
    path = "/api/v1/search/peetprint",
    tag = "search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Counts of co-occurring values", body = Correlation)
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn search_peetprint(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Correlation> {
    Json(state.engine.by_composite_fingerprint(&query.by).await)
}

/// Look up by user-agent
///
/// The value is percent-decoded once more after query-string parsing; an
/// undecodable value yields empty maps.
#[utoipa::path(
    get,
    path = "/api/v1/search/user-agent",
    tag = "search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Counts of co-occurring values", body = Correlation)
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn search_user_agent(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Correlation> {
    Json(state.engine.by_user_agent(&query.by).await)
}

/// Look up by any dimension named in the path
#[utoipa::path(
    get,
    path = "/api/v1/search/{dimension}",
    tag = "search",
    params(
        ("dimension" = String, Path, description = "ja3, h2, peetprint or user-agent"),
        SearchQuery
    ),
    responses(
        (status = 200, description = "Counts of co-occurring values", body = Correlation),
        (status = 400, description = "Unknown dimension", body = ApiErrorResponse)
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn search_dimension(
    State(state): State<Arc<AppState>>,
    Path(dimension): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Correlation>, ApiError> {
    let dimension: Dimension = dimension.parse()?;
    Ok(Json(state.engine.lookup(dimension, &query.by).await))
}
