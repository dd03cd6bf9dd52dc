//! Health, status, and metrics endpoints.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use reducer_client::ReducerMode;

use crate::state::AppState;

/// GET /health - liveness check.
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "climate-api",
    }))
}

/// GET /api/climate/status - reducer provenance and dataset registry.
pub async fn status_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let mode = match state.mode {
        ReducerMode::Platform => "platform",
        ReducerMode::Synthetic => "synthetic",
    };

    Json(json!({
        "success": true,
        "generatedAt": chrono::Utc::now().to_rfc3339(),
        "reducer": {
            "mode": mode,
            "description": state.engine.reducer().describe(),
        },
        "datasets": [
            "temperature-projection",
            "precipitation-drought",
            "urban-heat-island",
            "groundwater",
            "wet-bulb",
        ],
        "tileCacheEntries": state.tile_cache.len().await,
    }))
}

/// GET /metrics - Prometheus exposition.
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let body = state.metrics.render();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}
