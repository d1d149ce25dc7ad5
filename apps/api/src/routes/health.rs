use axum::{extract::State, Json};
use serde::Serialize;

use crate::llm_client::BackendStatus;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub backend: &'static str,
    pub model: String,
    pub completion: BackendStatus,
}

/// GET /api/health
/// Reports service version and whether the completion backend is reachable.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend = state.matcher.backend();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        backend: backend.name(),
        model: backend.model().to_string(),
        completion: backend.status().await,
    })
}
