//! Client for the JobTech JobSearch API (`/search`).

use std::time::Duration;

use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::matching::models::JobPosting;

pub mod handlers;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum JobSearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JobSearch API returned status {status}")]
    Status { status: u16 },
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Default, Deserialize)]
struct Hit {
    id: String,
    headline: Option<String>,
    employer: Option<Named>,
    workplace_address: Option<WorkplaceAddress>,
    description: Option<Description>,
    must_have: Option<SkillSet>,
    nice_to_have: Option<SkillSet>,
    experience_required: Option<bool>,
    publication_date: Option<String>,
    webpage_url: Option<String>,
    application_details: Option<ApplicationDetails>,
}

#[derive(Debug, Default, Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WorkplaceAddress {
    municipality: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Description {
    text: Option<String>,
    text_formatted: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SkillSet {
    #[serde(default)]
    skills: Vec<Skill>,
}

#[derive(Debug, Deserialize)]
struct Skill {
    label: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApplicationDetails {
    url: Option<String>,
}

#[derive(Clone)]
pub struct JobSearchClient {
    client: Client,
    base_url: String,
}

impl JobSearchClient {
    pub fn new(base_url: &str) -> Result<Self, JobSearchError> {
        Ok(Self {
            client: Client::builder().timeout(SEARCH_TIMEOUT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Searches postings by free-text role. An empty result is not an error.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<JobPosting>, JobSearchError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query.to_string()),
                ("limit", limit.to_string()),
                ("offset", "0".to_string()),
            ])
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("JobSearch API returned {status} for query '{query}'");
            return Err(JobSearchError::Status {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response.json().await?;
        debug!("JobSearch returned {} hits for '{query}'", body.hits.len());

        Ok(body.hits.into_iter().map(into_posting).collect())
    }
}

fn into_posting(hit: Hit) -> JobPosting {
    let requirements = requirements_text(&hit);
    let description = hit.description.unwrap_or_default();

    JobPosting {
        id: hit.id,
        headline: hit.headline,
        employer: hit.employer.and_then(|e| e.name),
        location: hit.workplace_address.and_then(|a| a.municipality),
        description: non_empty(description.text).or_else(|| non_empty(description.text_formatted)),
        requirements,
        url: non_empty(hit.webpage_url).or_else(|| hit.application_details.and_then(|d| d.url)),
        published: hit.publication_date.as_deref().and_then(parse_published),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Joins required skills, merit skills and the experience flag into one line.
fn requirements_text(hit: &Hit) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(skills) = skill_labels(hit.must_have.as_ref()) {
        parts.push(format!("Required: {skills}"));
    }
    if let Some(skills) = skill_labels(hit.nice_to_have.as_ref()) {
        parts.push(format!("Meritorious: {skills}"));
    }
    if hit.experience_required == Some(true) {
        parts.push("Experience required".to_string());
    }

    (!parts.is_empty()).then(|| parts.join(". "))
}

fn skill_labels(set: Option<&SkillSet>) -> Option<String> {
    let labels: Vec<&str> = set?.skills.iter().map(|s| s.label.as_str()).collect();
    (!labels.is_empty()).then(|| labels.join(", "))
}

fn parse_published(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}
