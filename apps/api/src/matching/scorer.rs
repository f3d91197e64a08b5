use crate::matching::vectorizer::WeightedPair;
use crate::matching::{MatchError, MatchResult};

/// Upper bound on the number of reported missing keywords.
pub const MAX_MISSING_KEYWORDS: usize = 10;

/// Cosine similarity of two vectors; 0.0 when either has zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, MatchError> {
    if a.len() != b.len() {
        return Err(MatchError::DimensionMismatch {
            resume: a.len(),
            job: b.len(),
        });
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    let similarity = dot / (norm_a * norm_b);
    if !similarity.is_finite() {
        return Err(MatchError::NonFinite);
    }
    Ok(similarity)
}

/// Terms weighted in the job vector but absent from the resume, in vocabulary order.
///
/// One-sided: a resume term with any nonzero weight is never reported.
pub fn missing_keywords(pair: &WeightedPair) -> Vec<String> {
    pair.vocabulary
        .iter()
        .zip(pair.job.iter().zip(&pair.resume))
        .filter(|(_, (job, resume))| **job > 0.0 && **resume == 0.0)
        .map(|(term, _)| term.clone())
        .take(MAX_MISSING_KEYWORDS)
        .collect()
}

/// Scores a vectorized pair: percentage similarity plus keyword gaps.
pub fn score(pair: &WeightedPair) -> Result<MatchResult, MatchError> {
    if pair.vocabulary.len() != pair.job.len() {
        return Err(MatchError::DimensionMismatch {
            resume: pair.vocabulary.len(),
            job: pair.job.len(),
        });
    }
    let similarity = cosine_similarity(&pair.resume, &pair.job)?;
    let match_percentage = round_to_hundredths((similarity * 100.0).clamp(0.0, 100.0));

    Ok(MatchResult {
        match_percentage,
        missing_keywords: missing_keywords(pair),
        error: None,
    })
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
