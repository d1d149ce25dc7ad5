//! Response Parser for the JSON reply form.

use serde::Deserialize;
use tracing::warn;

use crate::matching::models::{clamp_score, JobPosting, MatchResult};

pub const UNANALYSED_PLACEHOLDER: &str = "Could not analyse this job";
pub const FAILED_SUMMARY: &str = "An error occurred during the analysis.";

#[derive(Debug, Deserialize)]
struct StructuredReply {
    score: f64,
    matches: Option<Vec<String>>,
    missing: Option<Vec<String>>,
    summary: Option<String>,
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}

/// The outermost `{ ... }` span, for replies that wrap the object in prose.
fn outer_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn decode(raw: &str) -> Result<StructuredReply, serde_json::Error> {
    let text = strip_code_fences(raw);
    serde_json::from_str(text).or_else(|err| match outer_object(text) {
        Some(object) if object != text => serde_json::from_str(object),
        _ => Err(err),
    })
}

/// Parses a JSON reply into a `MatchResult`. A reply that cannot be decoded
/// yields score 0, a placeholder `missing` entry and a failure summary.
///
/// Scores are clamped to 0..=100, same as the delimited form.
pub fn parse_structured(raw: &str, job: &JobPosting) -> MatchResult {
    let mut result = MatchResult::for_job(job);

    match decode(raw) {
        Ok(reply) => {
            result.score = clamp_score(reply.score.round() as i64);
            result.matches = clean_entries(reply.matches.unwrap_or_default());
            result.missing = clean_entries(reply.missing.unwrap_or_default());
            result.reasoning = reply.summary.unwrap_or_default().trim().to_string();
        }
        Err(e) => {
            warn!(job_id = %job.id, "Could not decode JSON analysis: {e}");
            result.missing = vec![UNANALYSED_PLACEHOLDER.to_string()];
            result.reasoning = FAILED_SUMMARY.to_string();
        }
    }

    result
}

fn clean_entries(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}
