use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const UNTITLED_POSITION: &str = "untitled position";
pub const UNKNOWN_EMPLOYER: &str = "unknown employer";
pub const UNKNOWN_LOCATION: &str = "unknown location";
pub const NO_DESCRIPTION: &str = "no description provided";

/// Reasoning text used when a reply could not be interpreted at all.
pub const PARSE_FAILURE_REASONING: &str = "Could not parse the analysis.";
/// Reasoning text for jobs whose completion call never produced a reply.
pub const INCOMPLETE_ANALYSIS_REASONING: &str = "The analysis was incomplete.";
pub const ANALYSIS_FAILED_REASONING: &str = "The analysis of this job failed.";

/// Text extracted from an uploaded resume. No structure is assumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateProfile(String);

impl CandidateProfile {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

/// One posting returned by the job-search API. Every text field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: String,
    pub headline: Option<String>,
    pub employer: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub url: Option<String>,
    pub published: Option<NaiveDateTime>,
}

impl JobPosting {
    pub fn headline_or_default(&self) -> &str {
        non_blank(self.headline.as_deref()).unwrap_or(UNTITLED_POSITION)
    }

    pub fn employer_or_default(&self) -> &str {
        non_blank(self.employer.as_deref()).unwrap_or(UNKNOWN_EMPLOYER)
    }

    pub fn location_or_default(&self) -> &str {
        non_blank(self.location.as_deref()).unwrap_or(UNKNOWN_LOCATION)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| v.chars().any(|c| !c.is_whitespace() && !c.is_control()))
}

/// Outcome of scoring one posting against one profile.
///
/// `score` is always within 0..=100. A failed analysis still yields a record
/// with score 0 and a non-empty `reasoning` (and `error` for upstream failures).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub job_id: String,
    pub headline: String,
    pub employer: String,
    pub location: String,
    pub url: Option<String>,
    pub score: u8,
    pub matches: Vec<String>,
    pub missing: Vec<String>,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MatchResult {
    /// Empty zero-score record carrying the posting's display fields.
    pub fn for_job(job: &JobPosting) -> Self {
        Self {
            job_id: job.id.clone(),
            headline: job.headline_or_default().to_string(),
            employer: job.employer_or_default().to_string(),
            location: job.location_or_default().to_string(),
            url: job.url.clone(),
            score: 0,
            matches: Vec::new(),
            missing: Vec::new(),
            reasoning: String::new(),
            error: None,
        }
    }

    /// Zero-score record for a job whose completion call failed.
    pub fn failed(job: &JobPosting, error: impl Into<String>) -> Self {
        Self {
            reasoning: ANALYSIS_FAILED_REASONING.to_string(),
            error: Some(error.into()),
            ..Self::for_job(job)
        }
    }
}

/// Clamps any integer into the 0..=100 score range.
pub fn clamp_score(raw: i64) -> u8 {
    // clamp guarantees the value fits
    raw.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_score_bounds() {
        assert_eq!(clamp_score(150), 100);
        assert_eq!(clamp_score(-5), 0);
        assert_eq!(clamp_score(42), 42);
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let job = JobPosting {
            id: "1".to_string(),
            employer: Some("   ".to_string()),
            ..Default::default()
        };
        let result = MatchResult::for_job(&job);
        assert_eq!(result.headline, UNTITLED_POSITION);
        assert_eq!(result.employer, UNKNOWN_EMPLOYER);
        assert_eq!(result.location, UNKNOWN_LOCATION);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_control_only_headline_uses_placeholder() {
        let job = JobPosting {
            id: "1".to_string(),
            headline: Some("\x07\x00".to_string()),
            ..Default::default()
        };
        assert_eq!(job.headline_or_default(), UNTITLED_POSITION);
    }

    #[test]
    fn test_failed_result_carries_error_and_reasoning() {
        let job = JobPosting {
            id: "42".to_string(),
            headline: Some("Backend Developer".to_string()),
            ..Default::default()
        };
        let result = MatchResult::failed(&job, "Analysis failed: timed out");
        assert_eq!(result.score, 0);
        assert_eq!(result.job_id, "42");
        assert_eq!(result.headline, "Backend Developer");
        assert!(!result.reasoning.is_empty());
        assert_eq!(result.error.as_deref(), Some("Analysis failed: timed out"));
    }

    #[test]
    fn test_match_result_serializes_camel_case_without_empty_error() {
        let job = JobPosting {
            id: "7".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(MatchResult::for_job(&job)).unwrap();
        assert_eq!(value["jobId"], "7");
        assert!(value.get("error").is_none());
    }
}
