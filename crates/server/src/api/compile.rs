use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use quali_core::{CompilationRequest, StrategyStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::ErrorResponse;
use crate::state::AppState;

/// Header naming the strategy that produced the PDF
pub const COMPILED_BY_HEADER: &str = "x-compiled-by";

/// Body of `POST /compile`
#[derive(Debug, Deserialize)]
pub struct CompileBody {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct CompilerStatusResponse {
    pub strategies: Vec<StrategyStatus>,
}

/// Compile LaTeX source and return the PDF inline
pub async fn compile(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CompileBody>,
) -> Response {
    if body.identifier.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("identifier must not be empty")),
        )
            .into_response();
    }
    if body.source.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("source must not be empty")),
        )
            .into_response();
    }

    info!(identifier = %body.identifier, bytes = body.source.len(), "Compile requested");

    match state
        .orchestrator()
        .compile(CompilationRequest::new(body.identifier, body.source))
        .await
    {
        Ok(pdf) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (header::CONTENT_DISPOSITION, "inline; filename=\"compiled.pdf\""),
                (HeaderName::from_static(COMPILED_BY_HEADER), pdf.strategy.as_str()),
            ],
            pdf.bytes,
        )
            .into_response(),
        // Causes were logged by the orchestrator; only the generic message leaves
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

/// Availability of each configured strategy
pub async fn compiler_status(State(state): State<Arc<AppState>>) -> Json<CompilerStatusResponse> {
    Json(CompilerStatusResponse {
        strategies: state.orchestrator().status().await,
    })
}
