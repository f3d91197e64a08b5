//! Route handler for resume/job matching.

use axum::Json;
use serde::Deserialize;

use crate::errors::{ApiJson, AppError};
use crate::matching::{calculate_match_score, MatchResult};
use crate::models::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub job_description: String,
}

/// POST /match-jobs
///
/// Scores a resume against a job description. Scoring failures are reported
/// inside `data.error`, not as an HTTP error.
pub async fn handle_match(
    ApiJson(request): ApiJson<MatchRequest>,
) -> Result<Json<ApiResponse<MatchResult>>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    // TF-IDF over up to two 1 MiB inputs is CPU-bound
    let MatchRequest {
        resume_text,
        job_description,
    } = request;
    let result =
        tokio::task::spawn_blocking(move || calculate_match_score(&resume_text, &job_description))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Match scoring task failed: {e}")))?;
    Ok(Json(ApiResponse::ok(result)))
}
