use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::analysis::TextAnalyzer;
use crate::config::Config;
use crate::jobs::aggregator::JobAggregator;
use crate::jobs::providers::{AdzunaProvider, JSearchProvider, JobProvider, RemotiveProvider};
use crate::jobs::scraper::JobPageScraper;
use crate::llm_client::{GeminiBackend, GroqBackend, LlmBackend};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// LLM fallback chain used by `/analyze`, `/process-resume` and `/recommend-jobs`.
    pub analyzer: Arc<TextAnalyzer>,
    pub aggregator: Arc<JobAggregator>,
    pub scraper: JobPageScraper,
    /// Client for document downloads.
    pub http: Client,
}

impl AppState {
    /// Wires the LLM chain (Groq, then Gemini) and the job providers
    /// (JSearch, Adzuna, Remotive) from configuration.
    pub fn from_config(config: Config) -> reqwest::Result<Self> {
        let provider_timeout = Duration::from_secs(config.provider_timeout_secs);
        let llm_timeout = Duration::from_secs(config.llm_timeout_secs);

        let llm_http = Client::builder().timeout(llm_timeout).build()?;
        let http = Client::builder().timeout(provider_timeout).build()?;

        let backends: Vec<Arc<dyn LlmBackend>> = vec![
            Arc::new(GroqBackend::new(llm_http.clone(), config.groq_api_key.clone())),
            Arc::new(GeminiBackend::new(llm_http, config.gemini_api_key.clone())),
        ];
        let providers: Vec<Arc<dyn JobProvider>> = vec![
            Arc::new(JSearchProvider::new(http.clone(), config.rapidapi_key.clone())),
            Arc::new(AdzunaProvider::new(
                http.clone(),
                config.adzuna_app_id.clone(),
                config.adzuna_app_key.clone(),
                config.adzuna_country.clone(),
            )),
            Arc::new(RemotiveProvider::new(http.clone(), config.remotive_enabled)),
        ];

        Ok(AppState {
            analyzer: Arc::new(TextAnalyzer::new(backends, llm_timeout)),
            aggregator: Arc::new(JobAggregator::new(providers, provider_timeout)),
            scraper: JobPageScraper::new(provider_timeout)?,
            http,
            config,
        })
    }
}
