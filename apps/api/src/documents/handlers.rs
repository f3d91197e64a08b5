//! Route handler for resume document processing.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::{head, AnalysisOutcome};
use crate::documents::extract_text;
use crate::errors::{ApiJson, AppError};
use crate::models::profile::ResumeProfile;
use crate::state::AppState;

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct ProcessResumeRequest {
    pub file_path: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessResumeResponse {
    pub success: bool,
    pub text_preview: String,
    pub data: AnalysisOutcome<ResumeProfile>,
}

/// POST /process-resume
///
/// Extracts text from a PDF (local path or URL) and analyzes it.
pub async fn handle_process_resume(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ProcessResumeRequest>,
) -> Result<Json<ProcessResumeResponse>, AppError> {
    let file_path = req.file_path.trim();
    if file_path.is_empty() {
        return Err(AppError::Validation("file_path cannot be empty".to_string()));
    }

    let text = extract_text(&state.http, file_path).await?;
    let data = state.analyzer.analyze_resume(&text).await.into();

    Ok(Json(ProcessResumeResponse {
        success: true,
        text_preview: head(&text, PREVIEW_CHARS).to_string(),
        data,
    }))
}
