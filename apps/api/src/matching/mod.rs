//! Resume / job-description matching: TF-IDF vectorization, cosine scoring
//! and keyword gap analysis.

pub mod handlers;
pub mod scorer;
pub mod stop_words;
pub mod vectorizer;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{document} is too large ({bytes} bytes, max {max})")]
    InputTooLarge {
        document: String,
        bytes: usize,
        max: usize,
    },

    #[error("vector dimensions differ (resume {resume}, job {job})")]
    DimensionMismatch { resume: usize, job: usize },

    #[error("similarity is not a finite number")]
    NonFinite,
}

/// Relevance of a resume to a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_percentage: f64,
    pub missing_keywords: Vec<String>,
    /// Set only when scoring failed internally; the score is then zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MatchResult {
    fn failed(error: &MatchError) -> Self {
        Self {
            match_percentage: 0.0,
            missing_keywords: vec![],
            error: Some(error.to_string()),
        }
    }
}

/// Scores `resume_text` against `job_description`.
///
/// Never fails: internal errors come back as a zero score carrying `error`.
pub fn calculate_match_score(resume_text: &str, job_description: &str) -> MatchResult {
    vectorizer::vectorize(resume_text, job_description)
        .and_then(|pair| scorer::score(&pair))
        .unwrap_or_else(|e| {
            warn!("Matching failed: {e}");
            MatchResult::failed(&e)
        })
}
