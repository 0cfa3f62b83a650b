use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use quali_core::CompiledArtifact;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ErrorResponse;
use crate::state::AppState;

/// Maximum allowed limit for artifact listings
const MAX_LIMIT: i64 = 1000;

/// Default limit for artifact listings
const DEFAULT_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ArtifactQueryParams {
    /// Maximum number of markers to return (default 100, max 1000)
    pub limit: Option<i64>,
    /// Pagination offset (default 0)
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactListResponse {
    pub artifacts: Vec<CompiledArtifact>,
    /// Total number of recorded identifiers
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// List compiled artifact markers, newest first
pub async fn list_artifacts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ArtifactQueryParams>,
) -> ApiResult<ArtifactListResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let store = state.artifact_store();
    let artifacts = store.list(limit, offset).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("Failed to list artifacts: {}", e))),
        )
    })?;
    let total = store.count().map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("Failed to count artifacts: {}", e))),
        )
    })?;

    Ok(Json(ArtifactListResponse {
        artifacts,
        total,
        limit,
        offset,
    }))
}

/// Marker for a single identifier
pub async fn get_artifact(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
) -> ApiResult<CompiledArtifact> {
    match state.artifact_store().get(&identifier) {
        Ok(Some(artifact)) => Ok(Json(artifact)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!(
                "No compiled artifact for '{}'",
                identifier
            ))),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("Failed to load artifact: {}", e))),
        )),
    }
}
