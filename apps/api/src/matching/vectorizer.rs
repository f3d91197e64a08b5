//! Joint TF-IDF vectorization of a resume / job-description pair.
//!
//! The two documents form the whole corpus: a term found in both gets
//! `idf = 1.0`, a term found in only one gets `idf = ln(3/2) + 1`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::matching::stop_words::is_stop_word;
use crate::matching::MatchError;

/// Inputs above this size are rejected rather than tokenized.
pub const MAX_INPUT_BYTES: usize = 1024 * 1024;

/// Number of documents in the comparison corpus.
const CORPUS_SIZE: f64 = 2.0;

/// Two weight vectors indexed by the same sorted vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPair {
    pub vocabulary: Vec<String>,
    pub resume: Vec<f64>,
    pub job: Vec<f64>,
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Two or more word characters between word boundaries.
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

/// Lowercases, splits on word boundaries and drops stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .map(String::from)
        .collect()
}

fn term_counts(tokens: &[String]) -> BTreeMap<&str, f64> {
    let mut counts = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Builds the joint vocabulary and L2-normalized TF-IDF vectors for both texts.
///
/// When either text has no tokens left after filtering, both vectors are
/// zero vectors; scoring treats that as a zero match.
pub fn vectorize(resume_text: &str, job_text: &str) -> Result<WeightedPair, MatchError> {
    for (label, text) in [("resume", resume_text), ("job description", job_text)] {
        if text.len() > MAX_INPUT_BYTES {
            return Err(MatchError::InputTooLarge {
                document: label.to_string(),
                bytes: text.len(),
                max: MAX_INPUT_BYTES,
            });
        }
    }

    let resume_tokens = tokenize(resume_text);
    let job_tokens = tokenize(job_text);
    let resume_counts = term_counts(&resume_tokens);
    let job_counts = term_counts(&job_tokens);

    let vocabulary: Vec<String> = resume_counts
        .keys()
        .chain(job_counts.keys())
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect();

    if resume_tokens.is_empty() || job_tokens.is_empty() {
        let dimension = vocabulary.len();
        return Ok(WeightedPair {
            vocabulary,
            resume: vec![0.0; dimension],
            job: vec![0.0; dimension],
        });
    }

    let idf: Vec<f64> = vocabulary
        .iter()
        .map(|term| {
            let df = [&resume_counts, &job_counts]
                .iter()
                .filter(|counts| counts.contains_key(term.as_str()))
                .count() as f64;
            ((1.0 + CORPUS_SIZE) / (1.0 + df)).ln() + 1.0
        })
        .collect();

    let weigh = |counts: &BTreeMap<&str, f64>| -> Vec<f64> {
        let raw: Vec<f64> = vocabulary
            .iter()
            .zip(&idf)
            .map(|(term, idf)| counts.get(term.as_str()).copied().unwrap_or(0.0) * idf)
            .collect();
        l2_normalize(raw)
    };

    Ok(WeightedPair {
        resume: weigh(&resume_counts),
        job: weigh(&job_counts),
        vocabulary,
    })
}

fn l2_normalize(mut weights: Vec<f64>) -> Vec<f64> {
    let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        weights.iter_mut().for_each(|w| *w /= norm);
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_drops_stop_words() {
        let tokens = tokenize("Senior Python engineer with the Kubernetes experience");
        assert_eq!(
            tokens,
            vec!["senior", "python", "engineer", "kubernetes", "experience"]
        );
    }

    #[test]
    fn test_tokenize_skips_single_characters() {
        assert_eq!(tokenize("C R Rust"), vec!["rust"]);
    }

    #[test]
    fn test_vocabulary_is_sorted_union() {
        let pair = vectorize("rust tokio", "tokio axum").unwrap();
        assert_eq!(pair.vocabulary, vec!["axum", "rust", "tokio"]);
        assert_eq!(pair.resume.len(), 3);
        assert_eq!(pair.job.len(), 3);
    }

    #[test]
    fn test_shared_terms_weigh_less_than_unique_terms() {
        let pair = vectorize("rust tokio", "tokio axum").unwrap();
        // resume: rust (unique) > tokio (shared)
        assert!(pair.resume[1] > pair.resume[2]);
        // job: axum (unique) > tokio (shared)
        assert!(pair.job[0] > pair.job[2]);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let pair = vectorize("rust rust tokio serde", "tokio axum tower").unwrap();
        for vector in [&pair.resume, &pair.job] {
            let norm: f64 = vector.iter().map(|w| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9, "norm was {norm}");
        }
    }

    #[test]
    fn test_empty_document_yields_zero_vectors() {
        let pair = vectorize("the and of", "rust engineer").unwrap();
        assert_eq!(pair.vocabulary, vec!["engineer", "rust"]);
        assert!(pair.resume.iter().all(|w| *w == 0.0));
        assert!(pair.job.iter().all(|w| *w == 0.0));
    }

    #[test]
    fn test_oversized_input_is_rejected() {
        let big = "a".repeat(MAX_INPUT_BYTES + 1);
        let err = vectorize(&big, "rust").unwrap_err();
        assert!(matches!(err, MatchError::InputTooLarge { .. }));
    }
}
