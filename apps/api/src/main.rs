mod config;
mod errors;
mod jobsearch;
mod llm_client;
mod matching;
mod pdf;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobsearch::JobSearchClient;
use crate::llm_client::build_backend;
use crate::matching::matcher::JobMatcher;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completion backend
    let backend = build_backend(&config)?;
    info!(
        "Completion backend: {} (model: {}, timeout: {}s)",
        backend.name(),
        backend.model(),
        config.completion_timeout.as_secs()
    );

    let status = backend.status().await;
    if status.available {
        info!("Completion backend reachable, {} models listed", status.models.len());
    } else {
        warn!(
            "Completion backend not reachable: {}",
            status.error.as_deref().unwrap_or("unknown error")
        );
    }

    // Initialize JobSearch client
    let job_search = JobSearchClient::new(&config.jobsearch_url)?;
    info!("JobSearch client initialized ({})", config.jobsearch_url);

    let matcher = Arc::new(JobMatcher::new(backend, config.matcher_config()));

    // Build app state
    let state = AppState {
        config: config.clone(),
        job_search,
        matcher,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
