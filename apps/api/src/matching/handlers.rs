use std::time::Instant;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::models::{CandidateProfile, MatchResult};
use crate::pdf::{extract_text, is_valid_pdf, MAX_UPLOAD_BYTES, MIN_PROFILE_CHARS};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub success: bool,
    pub job_role: String,
    pub total_jobs: usize,
    pub results: Vec<MatchResult>,
    pub duration_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Keeps the 413 of an upload that hit the body limit; anything else is a bad form.
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Upload exceeds the {} MiB limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        ))
    } else {
        AppError::Validation(e.body_text())
    }
}

struct ResumeUpload {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

/// POST /api/analyze
///
/// Multipart form with a `resume` PDF and a `jobRole` search term. Extracts
/// the resume text, fetches postings for the role and scores each one.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let started = Instant::now();
    let mut resume: Option<ResumeUpload> = None;
    let mut job_role: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("resume") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                resume = Some(ResumeUpload {
                    filename,
                    content_type,
                    data,
                });
            }
            Some("jobRole") => {
                let text = field.text().await.map_err(multipart_error)?;
                job_role = Some(text.trim().to_string());
            }
            _ => {}
        }
    }

    let resume = resume.ok_or_else(|| AppError::Validation("No resume file uploaded".into()))?;
    let job_role = job_role
        .filter(|role| !role.is_empty())
        .ok_or_else(|| AppError::Validation("jobRole is required".into()))?;

    if !is_valid_pdf(&resume.filename, resume.content_type.as_deref()) {
        return Err(AppError::Validation("Only PDF files are accepted".into()));
    }

    let analysis_id = Uuid::new_v4();
    info!(%analysis_id, "Analysis started for role '{job_role}'");

    info!(%analysis_id, "[1/4] Extracting text from {}", resume.filename);
    let profile = CandidateProfile::new(extract_text(resume.data).await?);
    if profile.char_count() < MIN_PROFILE_CHARS {
        return Err(AppError::Validation(
            "Could not extract enough text from the PDF. Is it a scanned image?".into(),
        ));
    }
    info!(%analysis_id, "Extracted {} characters", profile.char_count());

    info!(%analysis_id, "[2/4] Searching jobs for '{job_role}'");
    let jobs = state
        .job_search
        .search(&job_role, state.config.job_limit)
        .await?;

    if jobs.is_empty() {
        info!(%analysis_id, "No jobs found for '{job_role}'");
        return Ok(Json(AnalysisResponse {
            analysis_id,
            success: true,
            job_role: job_role.clone(),
            total_jobs: 0,
            results: Vec::new(),
            duration_secs: started.elapsed().as_secs_f64(),
            message: Some(format!("No jobs found for '{job_role}'")),
        }));
    }

    info!(%analysis_id, "[3/4] Analyzing {} jobs", jobs.len());
    let results = state.matcher.analyze_all(&profile, &jobs).await;

    let duration_secs = started.elapsed().as_secs_f64();
    info!(%analysis_id, "[4/4] Analysis complete in {duration_secs:.1}s");

    Ok(Json(AnalysisResponse {
        analysis_id,
        success: true,
        job_role,
        total_jobs: results.len(),
        results,
        duration_secs,
        message: None,
    }))
}
