use serde::Serialize;

use crate::matching::delimited::parse_delimited;
use crate::matching::models::{CandidateProfile, JobPosting, MatchResult};
use crate::matching::prompts::{delimited_prompt, json_prompt, PromptInputs, PromptLimits};
use crate::matching::structured::parse_structured;

/// The reply shape a completion backend is known to emit.
///
/// Each variant owns both halves of the contract: the prompt that asks for
/// that shape and the parser that reads it back. Parsers do not auto-detect
/// the other shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Labeled sections with bullet lists (`SCORE:`, `MATCHES:`, ...).
    DelimitedText,
    /// A single JSON object `{score, matches, missing, summary}`.
    StructuredJson,
}

impl ResponseFormat {
    pub fn build_prompt(
        self,
        profile: &CandidateProfile,
        job: &JobPosting,
        limits: &PromptLimits,
    ) -> String {
        let inputs = PromptInputs::prepare(profile, job, limits);
        match self {
            ResponseFormat::DelimitedText => delimited_prompt(&inputs),
            ResponseFormat::StructuredJson => json_prompt(&inputs),
        }
    }

    pub fn parse(self, raw: &str, job: &JobPosting) -> MatchResult {
        match self {
            ResponseFormat::DelimitedText => parse_delimited(raw, job),
            ResponseFormat::StructuredJson => parse_structured(raw, job),
        }
    }
}
