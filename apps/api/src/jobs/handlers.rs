//! Axum route handlers for job search, recommendation and page scraping.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{ApiJson, AppError};
use crate::models::job::JobListing;
use crate::models::profile::SearchCriteria;
use crate::models::response::ApiResponse;
use crate::state::AppState;

pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct SearchJobsRequest {
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendJobsRequest {
    pub resume_text: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendJobsResponse {
    pub success: bool,
    pub criteria: SearchCriteria,
    pub query: String,
    pub data: Vec<JobListing>,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeJobRequest {
    pub url: String,
}

/// POST /search-jobs
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SearchJobsRequest>,
) -> Result<Json<ApiResponse<Vec<JobListing>>>, AppError> {
    let query = req.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let listings = state
        .aggregator
        .aggregate(query, req.limit.unwrap_or(DEFAULT_LIMIT))
        .await;
    Ok(Json(ApiResponse::ok(listings)))
}

/// POST /recommend-jobs
///
/// Derives search criteria from the resume, then aggregates listings for the
/// derived query. Criteria extraction failure is a 502.
pub async fn handle_recommend_jobs(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RecommendJobsRequest>,
) -> Result<Json<RecommendJobsResponse>, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    let criteria = state
        .analyzer
        .extract_search_criteria(&req.resume_text)
        .await?;
    let query = criteria.effective_query().to_string();
    info!("Recommending jobs for query '{query}'");

    let data = state
        .aggregator
        .aggregate(&query, req.limit.unwrap_or(DEFAULT_LIMIT))
        .await;
    if data.iter().any(JobListing::is_sentinel) {
        warn!("No live listings for recommended query '{query}'");
    }

    Ok(Json(RecommendJobsResponse {
        success: true,
        criteria,
        query,
        data,
    }))
}

/// POST /scrape-job
pub async fn handle_scrape_job(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ScrapeJobRequest>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    let url = req.url.trim();
    if url.is_empty() {
        return Err(AppError::Validation("url cannot be empty".to_string()));
    }

    let content = state
        .scraper
        .scrape(url)
        .await
        .map_err(|e| AppError::Validation(format!("Could not scrape job post: {e}")))?;
    Ok(Json(ApiResponse::ok(content)))
}
