//! Liveness endpoint.

use axum::{extract::State, response::IntoResponse, Json};

use crate::AppState;

/// Service health and build version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is healthy"))
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.started_at.elapsed().as_secs(),
        "summary_cache": state.service.cache().backend_name(),
    }))
}
