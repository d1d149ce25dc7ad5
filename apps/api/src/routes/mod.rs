pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::jobsearch::handlers::handle_search_jobs;
use crate::matching::handlers::handle_analyze;
use crate::pdf::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Room for the multipart framing and the `jobRole` field around the file.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/analyze", post(handle_analyze))
        .route("/api/test/jobs", get(handle_search_jobs))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + FORM_OVERHEAD_BYTES))
        .with_state(state)
}
