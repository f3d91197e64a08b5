//! External job-search providers. Each one fetches raw listings and knows how
//! to shape its own payload into a [`JobListing`].

pub mod adzuna;
pub mod jsearch;
pub mod remotive;

use async_trait::async_trait;
use reqwest::Response;
use serde_json::Value;

use crate::fallback::{Provider, ProviderError};
use crate::models::job::JobListing;

pub use adzuna::AdzunaProvider;
pub use jsearch::JSearchProvider;
pub use remotive::RemotiveProvider;

#[async_trait]
pub trait JobProvider: Provider {
    /// Raw listings for `query`, at most `limit` of them.
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Value>, ProviderError>;

    /// Shapes one raw listing. Never fails; missing fields get placeholders.
    fn normalize(&self, raw: &Value) -> JobListing;

    /// How to enable this provider, shown when nothing is configured.
    fn setup_hint(&self) -> &str;
}

/// Reads a JSON body, turning non-success statuses into [`ProviderError::Api`].
pub(crate) async fn read_json(response: Response) -> Result<Value, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(response.json().await?)
}

/// Takes the array at `pointer` out of `payload`, keeping at most `limit` items.
pub(crate) fn take_items(
    mut payload: Value,
    pointer: &str,
    limit: usize,
) -> Result<Vec<Value>, ProviderError> {
    match payload.pointer_mut(pointer).map(Value::take) {
        Some(Value::Array(items)) => Ok(items.into_iter().take(limit).collect()),
        _ => Err(ProviderError::Malformed(format!(
            "missing '{}' array",
            pointer.trim_start_matches('/')
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_take_items_caps_length() {
        let payload = json!({"data": [1, 2, 3, 4]});
        assert_eq!(take_items(payload, "/data", 2).unwrap(), vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_take_items_missing_array_is_malformed() {
        let err = take_items(json!({"status": "ERROR"}), "/data", 5).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(ref m) if m.contains("data")));
    }

    #[test]
    fn test_take_items_wrong_type_is_malformed() {
        let err = take_items(json!({"jobs": "none"}), "/jobs", 5).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }
}
