//! Resume PDF intake: upload validation and in-process text extraction.

use std::path::Path;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
/// Shorter extractions are treated as an empty or image-only PDF.
pub const MIN_PROFILE_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF text extraction failed: {0}")]
    Extract(String),

    #[error("PDF extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Accepts only a `.pdf` filename declared as `application/pdf`.
pub fn is_valid_pdf(filename: &str, content_type: Option<&str>) -> bool {
    let has_pdf_extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    let is_pdf_mime = content_type.is_some_and(|ct| {
        ct.split(';')
            .next()
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/pdf"))
    });

    has_pdf_extension && is_pdf_mime
}

/// Extracts the text layer of a PDF on the blocking pool.
///
/// A panic inside the extractor surfaces as `PdfError::Task`.
pub async fn extract_text(data: Bytes) -> Result<String, PdfError> {
    let size = data.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await?
        .map_err(|e| PdfError::Extract(format!("{e:?}")))?;

    debug!("Extracted {} characters from {size} byte PDF", text.len());
    Ok(text.trim().to_string())
}
