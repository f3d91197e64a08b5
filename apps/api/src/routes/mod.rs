pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::handle_analyze;
use crate::documents::handlers::handle_process_resume;
use crate::jobs::handlers::{handle_recommend_jobs, handle_scrape_job, handle_search_jobs};
use crate::matching::handlers::handle_match;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/match-jobs", post(handle_match))
        .route("/analyze", post(handle_analyze))
        .route("/process-resume", post(handle_process_resume))
        .route("/scrape-job", post(handle_scrape_job))
        // Job search
        .route("/search-jobs", post(handle_search_jobs))
        .route("/recommend-jobs", post(handle_recommend_jobs))
        .with_state(state)
}
