//! Test doubles shared by unit tests across modules.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{BackendKind, Config};
use crate::jobsearch::JobSearchClient;
use crate::llm_client::{BackendStatus, CompletionBackend, LlmError};
use crate::matching::format::ResponseFormat;
use crate::matching::matcher::JobMatcher;
use crate::state::AppState;

pub const DEFAULT_FAKE_REPLY: &str = "SCORE: 50\nREASONING:\nDefault reply.";

pub enum FakeReply {
    Text(String),
    Error(LlmError),
    /// Never answers within any reasonable timeout.
    Hang,
}

/// Completion backend that answers from a script keyed by prompt substrings.
/// Each scripted reply is used once; unmatched prompts get `DEFAULT_FAKE_REPLY`.
pub struct FakeBackend {
    format: ResponseFormat,
    replies: Mutex<Vec<(String, FakeReply)>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new(format: ResponseFormat) -> Self {
        Self {
            format,
            replies: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(self, prompt_contains: &str, reply: FakeReply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push((prompt_contains.to_string(), reply));
        self
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn take_reply(&self, prompt: &str) -> Option<FakeReply> {
        let mut replies = self.replies.lock().unwrap();
        let index = replies.iter().position(|(key, _)| prompt.contains(key))?;
        Some(replies.remove(index).1)
    }
}

#[async_trait]
impl CompletionBackend for FakeBackend {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    fn response_format(&self) -> ResponseFormat {
        self.format
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.take_reply(prompt) {
            Some(FakeReply::Text(text)) => Ok(text),
            Some(FakeReply::Error(e)) => Err(e),
            Some(FakeReply::Hang) => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Err(LlmError::EmptyContent)
            }
            None => Ok(DEFAULT_FAKE_REPLY.to_string()),
        }
    }

    async fn status(&self) -> BackendStatus {
        BackendStatus {
            available: true,
            models: vec![self.model().to_string()],
            error: None,
        }
    }
}

/// Default configuration pointed at a local job-search server, with no delay
/// between completion calls.
fn test_config(jobsearch_url: &str) -> Config {
    Config {
        port: 0,
        rust_log: "debug".to_string(),
        backend: BackendKind::Ollama,
        ollama_url: "http://127.0.0.1:9".to_string(),
        ollama_model: "fake-model".to_string(),
        gemini_url: "http://127.0.0.1:9".to_string(),
        gemini_model: "fake-model".to_string(),
        gemini_api_key: None,
        jobsearch_url: jobsearch_url.to_string(),
        job_limit: 2,
        completion_timeout: Duration::from_secs(5),
        inter_call_delay: Duration::ZERO,
        profile_char_limit: 4000,
        description_char_limit: 2000,
    }
}

pub fn test_state(backend: FakeBackend, jobsearch_url: &str) -> AppState {
    let config = test_config(jobsearch_url);
    let matcher = JobMatcher::new(Arc::new(backend), config.matcher_config());
    AppState {
        job_search: JobSearchClient::new(&config.jobsearch_url).unwrap(),
        matcher: Arc::new(matcher),
        config,
    }
}

/// A one-page PDF whose text layer holds `lines` in Helvetica. Lines must not
/// contain parentheses or backslashes.
pub fn pdf_with_text(lines: &[&str]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 11 Tf\n72 720 Td\n");
    for line in lines {
        content.push_str(&format!("({line}) Tj\n0 -14 Td\n"));
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{content}endstream", content.len()),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", i + 1).as_bytes());
    }

    let xref_start = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.extend_from_slice(xref.as_bytes());
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    pdf
}

/// Resume text comfortably above the minimum profile length.
pub const RESUME_LINES: &[&str] = &[
    "Jane Doe - Senior Backend Engineer",
    "Eight years building Rust and Go services on Linux",
    "PostgreSQL, Kafka and Kubernetes in production",
    "Led a team of five engineers at Acme AB in Stockholm",
];
