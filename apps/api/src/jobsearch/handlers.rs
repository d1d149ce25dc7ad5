use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::models::JobPosting;
use crate::state::AppState;

const DEFAULT_QUERY: &str = "developer";
const DEFAULT_LIMIT: u32 = 5;
const MAX_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct SearchJobsQuery {
    pub q: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SearchJobsResponse {
    pub jobs: Vec<JobPosting>,
}

/// GET /api/test/jobs
///
/// Smoke test for the JobSearch integration. No scoring is done.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Query(params): Query<SearchJobsQuery>,
) -> Result<Json<SearchJobsResponse>, AppError> {
    let query = params
        .q
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_QUERY.to_string());
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let jobs = state.job_search.search(&query, limit).await?;
    Ok(Json(SearchJobsResponse { jobs }))
}
