/// LLM Client: the single point of entry for all completion-service calls.
///
/// ARCHITECTURAL RULE: No other module may call a completion service directly.
/// All model interactions go through a `CompletionBackend`.
///
/// Each call is attempted at most once. There is no retry or backoff.
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::{BackendKind, Config};
use crate::matching::format::ResponseFormat;

pub mod gemini;
pub mod ollama;
pub mod prompts;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Completion call timed out after {secs}s")]
    Timeout { secs: u64 },
}

impl LlmError {
    /// Short cause that is safe to show to the end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            LlmError::Http(_) => "the completion service could not be reached",
            LlmError::Api { .. } => "the completion service returned an error",
            LlmError::Parse(_) => "the completion service sent an unexpected reply",
            LlmError::EmptyContent => "the completion service returned no content",
            LlmError::Timeout { .. } => "the completion service timed out",
        }
    }
}

/// Availability report for `/api/health`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendStatus {
    pub available: bool,
    pub models: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A completion service that turns a prompt into raw reply text.
///
/// Carried in `JobMatcher` as `Arc<dyn CompletionBackend>` so the scoring
/// driver never depends on a concrete service or reply shape.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    /// Reply shape this backend is prompted for and parsed as.
    fn response_format(&self) -> ResponseFormat;

    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    async fn status(&self) -> BackendStatus;
}

/// Builds the backend selected by `COMPLETION_BACKEND`.
pub fn build_backend(config: &Config) -> anyhow::Result<Arc<dyn CompletionBackend>> {
    let backend: Arc<dyn CompletionBackend> = match config.backend {
        BackendKind::Ollama => Arc::new(OllamaClient::new(
            &config.ollama_url,
            &config.ollama_model,
            config.completion_timeout,
        )?),
        BackendKind::Gemini => {
            let api_key = config
                .gemini_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("GEMINI_API_KEY is required for the gemini backend"))?;
            Arc::new(GeminiClient::new(
                &config.gemini_url,
                api_key,
                &config.gemini_model,
                config.completion_timeout,
            )?)
        }
    };
    Ok(backend)
}
