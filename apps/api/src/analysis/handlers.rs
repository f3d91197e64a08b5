//! Axum route handlers for text analysis.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::analysis::AnalysisOutcome;
use crate::errors::{ApiJson, AppError};
use crate::models::profile::ResumeProfile;
use crate::models::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// POST /analyze
///
/// Structures raw resume text. When every backend fails the response is
/// still 200, with `data` set to `{ "error": ... }`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeRequest>,
) -> Result<Json<ApiResponse<AnalysisOutcome<ResumeProfile>>>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let outcome = state.analyzer.analyze_resume(&request.text).await.into();
    Ok(Json(ApiResponse::ok(outcome)))
}
