use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus which LLM backends and job providers are usable.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-ai-api",
        "llm_backends": {
            "groq": config.groq_api_key.is_some(),
            "gemini": config.gemini_api_key.is_some(),
        },
        "job_providers": {
            "jsearch": config.rapidapi_key.is_some(),
            "adzuna": config.adzuna_app_id.is_some() && config.adzuna_app_key.is_some(),
            "remotive": config.remotive_enabled,
        }
    }))
}
