use std::sync::Arc;

use crate::config::Config;
use crate::jobsearch::JobSearchClient;
use crate::matching::matcher::JobMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub job_search: JobSearchClient,
    /// Scoring driver bound to the configured completion backend.
    pub matcher: Arc<JobMatcher>,
}
