use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

use crate::matching::matcher::MatcherConfig;
use crate::matching::prompts::{
    PromptLimits, DEFAULT_DESCRIPTION_CHAR_LIMIT, DEFAULT_PROFILE_CHAR_LIMIT,
};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:latest";
const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_JOBSEARCH_URL: &str = "https://jobsearch.api.jobtechdev.se";
const DEFAULT_JOB_LIMIT: u32 = 15;
const DEFAULT_INTER_CALL_DELAY_MS: u64 = 500;

/// Which completion service scores the jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Ollama,
    Gemini,
}

impl BackendKind {
    /// Per-call timeout used when `COMPLETION_TIMEOUT_SECS` is unset.
    fn default_timeout(self) -> Duration {
        match self {
            BackendKind::Ollama => Duration::from_secs(600),
            BackendKind::Gemini => Duration::from_secs(60),
        }
    }
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(BackendKind::Ollama),
            "gemini" => Ok(BackendKind::Gemini),
            other => Err(anyhow!(
                "unknown completion backend '{other}' (expected 'ollama' or 'gemini')"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a value is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub backend: BackendKind,
    pub ollama_url: String,
    pub ollama_model: String,
    pub gemini_url: String,
    pub gemini_model: String,
    pub gemini_api_key: Option<String>,
    pub jobsearch_url: String,
    pub job_limit: u32,
    pub completion_timeout: Duration,
    pub inter_call_delay: Duration,
    pub profile_char_limit: usize,
    pub description_char_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend: BackendKind = parse_or(&lookup, "COMPLETION_BACKEND", BackendKind::Ollama)?;
        let gemini_api_key = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty());

        if backend == BackendKind::Gemini && gemini_api_key.is_none() {
            bail!("Required environment variable 'GEMINI_API_KEY' is not set");
        }

        let timeout_secs = parse_or(
            &lookup,
            "COMPLETION_TIMEOUT_SECS",
            backend.default_timeout().as_secs(),
        )?;
        let delay_ms = parse_or(&lookup, "INTER_CALL_DELAY_MS", DEFAULT_INTER_CALL_DELAY_MS)?;

        Ok(Config {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            backend,
            ollama_url: lookup("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            ollama_model: lookup("OLLAMA_MODEL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            gemini_url: lookup("GEMINI_URL").unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string()),
            gemini_model: lookup("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_key,
            jobsearch_url: lookup("JOBSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_JOBSEARCH_URL.to_string()),
            job_limit: parse_or(&lookup, "JOB_LIMIT", DEFAULT_JOB_LIMIT)?,
            completion_timeout: Duration::from_secs(timeout_secs),
            inter_call_delay: Duration::from_millis(delay_ms),
            profile_char_limit: parse_or(&lookup, "PROFILE_CHAR_LIMIT", DEFAULT_PROFILE_CHAR_LIMIT)?,
            description_char_limit: parse_or(
                &lookup,
                "DESCRIPTION_CHAR_LIMIT",
                DEFAULT_DESCRIPTION_CHAR_LIMIT,
            )?,
        })
    }

    /// The slice of configuration the scoring driver needs.
    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig {
            call_timeout: self.completion_timeout,
            inter_call_delay: self.inter_call_delay,
            limits: PromptLimits {
                profile_chars: self.profile_char_limit,
                description_chars: self.description_char_limit,
            },
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        _ => Ok(default),
    }
}
