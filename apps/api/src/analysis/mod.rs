//! Text analysis through an ordered list of LLM backends.
//!
//! Each backend is asked for bare JSON. Output that still fails to parse after
//! delimiter unwrapping counts as that backend's failure, so the next backend
//! gets a turn.

pub mod handlers;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::analysis::prompts::{RESUME_ANALYSIS_PROMPT, SEARCH_CRITERIA_PROMPT};
use crate::errors::AppError;
use crate::fallback::{run_chain, FirstSuccess};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{parse_structured, LlmBackend};
use crate::models::profile::{ResumeProfile, SearchCriteria};

/// Characters of resume text sent for full profile analysis.
const ANALYSIS_INPUT_CHARS: usize = 10_000;
/// Characters of resume text sent for search criteria extraction.
const CRITERIA_INPUT_CHARS: usize = 5_000;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No LLM API keys configured")]
    NoBackends,

    #[error("All LLM backends failed: {0}")]
    Exhausted(String),
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        AppError::Llm(e.to_string())
    }
}

/// Either the structured result or the aggregated failure, encoded as data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome<T> {
    Structured(T),
    Failed { error: String },
}

impl<T> From<Result<T, AnalysisError>> for AnalysisOutcome<T> {
    fn from(result: Result<T, AnalysisError>) -> Self {
        match result {
            Ok(value) => AnalysisOutcome::Structured(value),
            Err(e) => AnalysisOutcome::Failed {
                error: e.to_string(),
            },
        }
    }
}

pub struct TextAnalyzer {
    backends: Vec<Arc<dyn LlmBackend>>,
    call_timeout: Duration,
}

impl TextAnalyzer {
    /// `backends` are tried in the given order.
    pub fn new(backends: Vec<Arc<dyn LlmBackend>>, call_timeout: Duration) -> Self {
        Self {
            backends,
            call_timeout,
        }
    }

    /// Runs the fallback chain until one backend returns parseable `T`.
    pub async fn structured<T>(&self, system: &str, prompt: &str) -> Result<T, AnalysisError>
    where
        T: DeserializeOwned + Send,
    {
        let mut first = FirstSuccess::<T>::default();
        let report = run_chain(
            &self.backends,
            self.call_timeout,
            &mut first,
            |backend, _| async move {
                let text = backend.complete(system, prompt).await?;
                parse_structured::<T>(&text)
            },
        )
        .await;

        match first.value {
            Some((backend, value)) => {
                info!("Structured output produced by {backend}");
                Ok(value)
            }
            None if report.nothing_available() => Err(AnalysisError::NoBackends),
            None => Err(AnalysisError::Exhausted(report.failure_summary())),
        }
    }

    pub async fn analyze_resume(&self, text: &str) -> Result<ResumeProfile, AnalysisError> {
        let prompt = RESUME_ANALYSIS_PROMPT.replace("{text}", head(text, ANALYSIS_INPUT_CHARS));
        self.structured(JSON_ONLY_SYSTEM, &prompt).await
    }

    pub async fn extract_search_criteria(
        &self,
        text: &str,
    ) -> Result<SearchCriteria, AnalysisError> {
        let prompt = SEARCH_CRITERIA_PROMPT.replace("{text}", head(text, CRITERIA_INPUT_CHARS));
        self.structured::<SearchCriteria>(JSON_ONLY_SYSTEM, &prompt)
            .await
            .map(SearchCriteria::normalized)
    }
}

/// The first `max_chars` characters of `text`.
pub fn head(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::fallback::{Provider, ProviderError};

    /// Backend returning canned text, or failing when `reply` is `None`.
    pub struct CannedBackend {
        pub name: &'static str,
        pub reply: Option<String>,
        pub calls: AtomicUsize,
    }

    impl CannedBackend {
        pub fn replying(name: &'static str, reply: &str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: None,
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Provider for CannedBackend {
        fn name(&self) -> &str {
            self.name
        }

        fn available(&self) -> bool {
            true
        }
    }

    #[async_trait]
    impl LlmBackend for CannedBackend {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().ok_or(ProviderError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            })
        }
    }

    pub fn analyzer(backends: Vec<Arc<CannedBackend>>) -> TextAnalyzer {
        let backends = backends
            .into_iter()
            .map(|b| b as Arc<dyn LlmBackend>)
            .collect();
        TextAnalyzer::new(backends, Duration::from_secs(5))
    }
}
