//! Ollama backend. Prompted for, and parsed as, the delimited reply form.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{BackendStatus, CompletionBackend, LlmError};
use crate::matching::format::ResponseFormat;

const TEMPERATURE: f32 = 0.3;
const TOP_P: f32 = 0.9;
const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl CompletionBackend for OllamaClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn response_format(&self) -> ResponseFormat {
        ResponseFormat::DelimitedText
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                top_p: TOP_P,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Ollama returned {}: {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let generated: GenerateResponse = serde_json::from_str(&body)?;
        debug!(
            "Ollama call succeeded: model={}, eval_count={:?}",
            self.model, generated.eval_count
        );

        match generated.response {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => {
                warn!("Unexpected Ollama response without text: {}", body);
                Err(LlmError::EmptyContent)
            }
        }
    }

    async fn status(&self) -> BackendStatus {
        let result = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let tags = match result {
            Ok(response) => response.json::<TagsResponse>().await,
            Err(e) => Err(e),
        };

        match tags {
            Ok(tags) => BackendStatus {
                available: true,
                models: tags.models.into_iter().map(|m| m.name).collect(),
                error: None,
            },
            Err(e) => BackendStatus {
                available: false,
                models: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }
}
