//! Scoring driver: prompt → completion call → parse, once per job, in sequence.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::llm_client::{CompletionBackend, LlmError};
use crate::matching::models::{CandidateProfile, JobPosting, MatchResult};
use crate::matching::prompts::PromptLimits;
use crate::matching::ranking::rank_results;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Upper bound for one completion call.
    pub call_timeout: Duration,
    /// Pause between consecutive calls, for upstream rate limits.
    pub inter_call_delay: Duration,
    pub limits: PromptLimits,
}

/// Scores job postings against a candidate profile.
///
/// Jobs are analysed strictly one at a time with at most one completion call
/// each. A failed or timed-out call turns into a zero-score result for that
/// job only; the rest of the batch continues.
pub struct JobMatcher {
    backend: Arc<dyn CompletionBackend>,
    config: MatcherConfig,
}

impl JobMatcher {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: MatcherConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &dyn CompletionBackend {
        self.backend.as_ref()
    }

    /// Scores a single job. Never fails.
    pub async fn analyze_job(&self, profile: &CandidateProfile, job: &JobPosting) -> MatchResult {
        let format = self.backend.response_format();
        let prompt = format.build_prompt(profile, job, &self.config.limits);
        debug!(
            job_id = %job.id,
            backend = self.backend.name(),
            prompt_chars = prompt.chars().count(),
            "Sending job to completion backend"
        );

        let reply = match tokio::time::timeout(
            self.config.call_timeout,
            self.backend.complete(&prompt),
        )
        .await
        {
            Ok(reply) => reply,
            Err(_) => Err(LlmError::Timeout {
                secs: self.config.call_timeout.as_secs(),
            }),
        };

        match reply {
            Ok(raw) => format.parse(&raw, job),
            Err(e) => {
                error!(
                    job_id = %job.id,
                    backend = self.backend.name(),
                    "Error analyzing job: {e}"
                );
                MatchResult::failed(job, format!("Analysis failed: {}", e.user_message()))
            }
        }
    }

    /// Scores every job in order and returns the results ranked by score.
    pub async fn analyze_all(
        &self,
        profile: &CandidateProfile,
        jobs: &[JobPosting],
    ) -> Vec<MatchResult> {
        let mut results = Vec::with_capacity(jobs.len());

        for (i, job) in jobs.iter().enumerate() {
            if i > 0 && !self.config.inter_call_delay.is_zero() {
                tokio::time::sleep(self.config.inter_call_delay).await;
            }
            info!(
                "Analyzing job {}/{}: {}",
                i + 1,
                jobs.len(),
                job.headline_or_default()
            );
            results.push(self.analyze_job(profile, job).await);
        }

        rank_results(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::format::ResponseFormat;
    use crate::test_support::{FakeBackend, FakeReply};

    fn job(id: &str, headline: &str) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            headline: Some(headline.to_string()),
            employer: Some("Acme".to_string()),
            description: Some("Backend role".to_string()),
            ..Default::default()
        }
    }

    fn config() -> MatcherConfig {
        MatcherConfig {
            call_timeout: Duration::from_secs(30),
            inter_call_delay: Duration::from_millis(500),
            limits: PromptLimits::default(),
        }
    }

    fn delimited(score: u8) -> FakeReply {
        FakeReply::Text(format!(
            "SCORE: {score}\nMATCHES:\n- Rust\nMISSING:\n- Go\nREASONING:\nScored {score}."
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_jobs_are_ranked_by_score() {
        let backend = FakeBackend::new(ResponseFormat::DelimitedText)
            .reply("Junior Developer", delimited(30))
            .reply("Senior Developer", delimited(85));
        let matcher = JobMatcher::new(Arc::new(backend), config());

        let jobs = vec![job("a", "Junior Developer"), job("b", "Senior Developer")];
        let results = matcher
            .analyze_all(&CandidateProfile::new("Rust engineer"), &jobs)
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].job_id, "b");
        assert_eq!(results[0].score, 85);
        assert_eq!(results[1].job_id, "a");
        assert_eq!(results[1].score, 30);
        assert_eq!(results[1].reasoning, "Scored 30.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_only_that_job() {
        let backend = FakeBackend::new(ResponseFormat::DelimitedText)
            .reply("Slow Corp Role", FakeReply::Hang)
            .reply("Fast Corp Role", delimited(40));
        let matcher = JobMatcher::new(Arc::new(backend), config());

        let jobs = vec![job("slow", "Slow Corp Role"), job("fast", "Fast Corp Role")];
        let results = matcher
            .analyze_all(&CandidateProfile::new("profile"), &jobs)
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].job_id, "fast");
        assert_eq!(results[0].score, 40);
        assert_eq!(results[1].job_id, "slow");
        assert_eq!(results[1].score, 0);
        let error = results[1].error.as_deref().unwrap();
        assert!(error.contains("timed out"));
        assert!(!results[1].reasoning.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_error_becomes_zero_score_result() {
        let backend = FakeBackend::new(ResponseFormat::StructuredJson).reply(
            "Data Engineer",
            FakeReply::Error(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            }),
        );
        let matcher = JobMatcher::new(Arc::new(backend), config());

        let result = matcher
            .analyze_job(&CandidateProfile::new("profile"), &job("x", "Data Engineer"))
            .await;
        assert_eq!(result.score, 0);
        let error = result.error.unwrap();
        assert!(error.starts_with("Analysis failed"));
        assert!(!error.contains("overloaded"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_format_selects_parser() {
        let backend = FakeBackend::new(ResponseFormat::StructuredJson).reply(
            "Data Engineer",
            FakeReply::Text(
                "```json\n{\"score\": 77, \"matches\": [\"SQL\"], \"missing\": [], \"summary\": \"Good.\"}\n```"
                    .to_string(),
            ),
        );
        let matcher = JobMatcher::new(Arc::new(backend), config());

        let result = matcher
            .analyze_job(&CandidateProfile::new("profile"), &job("x", "Data Engineer"))
            .await;
        assert_eq!(result.score, 77);
        assert_eq!(result.matches, vec!["SQL"]);
        assert_eq!(result.reasoning, "Good.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompt_respects_profile_budget() {
        let backend = Arc::new(FakeBackend::new(ResponseFormat::DelimitedText));
        let mut cfg = config();
        cfg.limits.profile_chars = 20;
        let matcher = JobMatcher::new(backend.clone(), cfg);

        let profile = CandidateProfile::new(format!("{}{}", "a".repeat(20), "OVERFLOW"));
        matcher.analyze_job(&profile, &job("x", "Any")).await;

        let prompts = backend.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(&"a".repeat(20)));
        assert!(!prompts[0].contains("OVERFLOW"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_jobs_are_called_in_order() {
        let backend = Arc::new(FakeBackend::new(ResponseFormat::DelimitedText));
        let matcher = JobMatcher::new(backend.clone(), config());

        let jobs = vec![job("1", "First Role"), job("2", "Second Role"), job("3", "Third Role")];
        matcher
            .analyze_all(&CandidateProfile::new("profile"), &jobs)
            .await;

        let prompts = backend.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("First Role"));
        assert!(prompts[1].contains("Second Role"));
        assert!(prompts[2].contains("Third Role"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_job_list() {
        let matcher = JobMatcher::new(
            Arc::new(FakeBackend::new(ResponseFormat::DelimitedText)),
            config(),
        );
        assert!(matcher
            .analyze_all(&CandidateProfile::new("profile"), &[])
            .await
            .is_empty());
    }
}
