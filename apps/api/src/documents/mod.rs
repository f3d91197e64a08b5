//! Resume document text extraction.
//!
//! Sources are either local PDF paths or http(s) URLs. Remote documents are
//! spooled to a temporary file that lives only as long as the extraction.

pub mod handlers;

use std::io::Write;
use std::path::{Path, PathBuf};

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::errors::AppError;

/// Remote documents larger than this are refused before extraction.
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to download document: {0}")]
    Download(#[from] reqwest::Error),

    #[error("Document download returned HTTP {0}")]
    DownloadStatus(u16),

    #[error("Document exceeds the {max} byte limit")]
    TooLarge { max: usize },

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("No text could be extracted from the document")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<ExtractionError> for AppError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::NotFound(_) => AppError::NotFound(e.to_string()),
            ExtractionError::Pdf(_) | ExtractionError::Empty | ExtractionError::TooLarge { .. } => {
                AppError::UnprocessableEntity(e.to_string())
            }
            ExtractionError::Download(_) | ExtractionError::DownloadStatus(_) => {
                AppError::Upstream(e.to_string())
            }
            ExtractionError::Io(_) | ExtractionError::Task(_) => {
                AppError::Internal(anyhow::Error::new(e))
            }
        }
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Extracts the text of the PDF at `source`, a local path or an http(s) URL.
/// The result is trimmed and never empty.
pub async fn extract_text(client: &Client, source: &str) -> Result<String, ExtractionError> {
    let text = if is_remote(source) {
        let bytes = download(client, source, MAX_DOCUMENT_BYTES).await?;
        tokio::task::spawn_blocking(move || extract_from_bytes(&bytes)).await??
    } else {
        let path = PathBuf::from(source);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(ExtractionError::NotFound(source.to_string()));
        }
        tokio::task::spawn_blocking(move || extract_from_path(&path)).await??
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractionError::Empty);
    }
    info!("Extracted {} characters from {source}", text.chars().count());
    Ok(text.to_string())
}

/// Streams the body, giving up as soon as it passes `max` bytes.
async fn download(client: &Client, url: &str, max: usize) -> Result<Vec<u8>, ExtractionError> {
    debug!("Downloading document from {url}");
    let mut response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ExtractionError::DownloadStatus(response.status().as_u16()));
    }
    if let Some(declared) = response.content_length() {
        if declared > max as u64 {
            return Err(ExtractionError::TooLarge { max });
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        append_capped(&mut body, &chunk, max)?;
    }
    Ok(body)
}

fn append_capped(body: &mut Vec<u8>, chunk: &[u8], max: usize) -> Result<(), ExtractionError> {
    if body.len() + chunk.len() > max {
        return Err(ExtractionError::TooLarge { max });
    }
    body.extend_from_slice(chunk);
    Ok(())
}

/// Runs on a blocking thread. The temporary file is removed when it drops.
fn extract_from_bytes(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut file = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(".pdf")
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    extract_from_path(file.path())
}

fn extract_from_path(path: &Path) -> Result<String, ExtractionError> {
    pdf_extract::extract_text(path).map_err(|e| ExtractionError::Pdf(e.to_string()))
}
