//! Prompt Builder: turns a candidate profile and one job posting into a bounded,
//! sanitized prompt for the completion backend.

use crate::llm_client::prompts::{GROUNDING_RULES, JSON_ONLY_INSTRUCTION};
use crate::matching::models::{
    CandidateProfile, JobPosting, NO_DESCRIPTION, UNKNOWN_EMPLOYER, UNKNOWN_LOCATION,
    UNTITLED_POSITION,
};
use crate::matching::sanitize::{sanitize_text, truncate_chars};

/// Labels of the delimited reply form. The parser also accepts aliases.
pub const SCORE_LABEL: &str = "SCORE";
pub const MATCHES_LABEL: &str = "MATCHES";
pub const MISSING_LABEL: &str = "MISSING";
pub const REASONING_LABEL: &str = "REASONING";

pub const DEFAULT_PROFILE_CHAR_LIMIT: usize = 4000;
pub const DEFAULT_DESCRIPTION_CHAR_LIMIT: usize = 2000;

/// Character budgets for the untrusted text injected into a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptLimits {
    pub profile_chars: usize,
    pub description_chars: usize,
}

impl Default for PromptLimits {
    fn default() -> Self {
        Self {
            profile_chars: DEFAULT_PROFILE_CHAR_LIMIT,
            description_chars: DEFAULT_DESCRIPTION_CHAR_LIMIT,
        }
    }
}

/// Sanitized, capped prompt fields. Placeholders fill every absent slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInputs {
    pub profile: String,
    pub headline: String,
    pub employer: String,
    pub location: String,
    pub description: String,
    pub requirements: Option<String>,
}

impl PromptInputs {
    pub fn prepare(profile: &CandidateProfile, job: &JobPosting, limits: &PromptLimits) -> Self {
        let profile = sanitize_text(profile.text());
        let description = sanitized_or(job.description.as_deref(), NO_DESCRIPTION);
        let requirements = job
            .requirements
            .as_deref()
            .map(sanitize_text)
            .filter(|r| !r.is_empty());

        Self {
            profile: truncate_chars(&profile, limits.profile_chars).to_string(),
            headline: sanitized_or(job.headline.as_deref(), UNTITLED_POSITION),
            employer: sanitized_or(job.employer.as_deref(), UNKNOWN_EMPLOYER),
            location: sanitized_or(job.location.as_deref(), UNKNOWN_LOCATION),
            description: truncate_chars(&description, limits.description_chars).to_string(),
            requirements,
        }
    }

    fn job_block(&self) -> String {
        let mut block = format!(
            "Title: {}\nEmployer: {}\nLocation: {}\nDescription: {}",
            self.headline, self.employer, self.location, self.description
        );
        if let Some(requirements) = &self.requirements {
            block.push_str("\nRequirements: ");
            block.push_str(requirements);
        }
        block
    }
}

/// Sanitizes first so a field that is only control characters still gets its placeholder.
fn sanitized_or(value: Option<&str>, placeholder: &str) -> String {
    let text = sanitize_text(value.unwrap_or_default());
    if text.is_empty() {
        placeholder.to_string()
    } else {
        text
    }
}

/// Prompt asking for the labeled, bullet-list reply form.
pub fn delimited_prompt(inputs: &PromptInputs) -> String {
    let job_block = inputs.job_block();
    let profile = &inputs.profile;

    format!(
        r#"You have extensive experience matching candidate profiles against job postings and judging how well a candidate fits a given role.

Given the candidate profile and job posting below, analyse how well the candidate matches the job.

CANDIDATE PROFILE:
{profile}

JOB POSTING:
{job_block}

TASK:
Analyse how well the candidate profile matches the job posting. Answer in exactly this format:

{SCORE_LABEL}: [0-100]

{MATCHES_LABEL} (what the candidate has that fits the job):
- [List concrete matches based on actual profile content]

{MISSING_LABEL} (what the job requires that the profile does not show):
- [List concrete things that are missing]

{REASONING_LABEL}:
[A short explanation in 2-3 sentences of why the match received this score]

{GROUNDING_RULES}"#
    )
}

/// Prompt asking for a single JSON object reply.
pub fn json_prompt(inputs: &PromptInputs) -> String {
    let job_block = inputs.job_block();
    let profile = &inputs.profile;

    format!(
        r#"You are a recruitment expert analysing how well a candidate's profile matches a job.

CANDIDATE PROFILE:
{profile}

JOB POSTING:
{job_block}

TASK:
Analyse the match between the candidate profile and the job posting. Give an honest, fact-based answer.

Return a JSON object with this EXACT structure:
{{
  "score": <an integer between 0 and 100>,
  "matches": [
    "skill or experience the candidate HAS that matches the job"
  ],
  "missing": [
    "skill or requirement the job asks for that is NOT visible in the profile"
  ],
  "summary": "A short summary (2-3 sentences) of why this score was given"
}}

{GROUNDING_RULES}
- The score must reflect the overall match

{JSON_ONLY_INSTRUCTION}"#
    )
}
