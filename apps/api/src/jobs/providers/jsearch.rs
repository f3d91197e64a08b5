//! JSearch (RapidAPI) provider. Requires `RAPIDAPI_KEY`.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::fallback::{Provider, ProviderError};
use crate::jobs::providers::{read_json, take_items, JobProvider};
use crate::models::job::{JobListing, RawFields};

const JSEARCH_HOST: &str = "jsearch.p.rapidapi.com";
const JSEARCH_URL: &str = "https://jsearch.p.rapidapi.com/search";

#[derive(Clone)]
pub struct JSearchProvider {
    client: Client,
    api_key: Option<String>,
}

impl JSearchProvider {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

impl Provider for JSearchProvider {
    fn name(&self) -> &str {
        "jsearch"
    }

    fn available(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl JobProvider for JSearchProvider {
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Value>, ProviderError> {
        let api_key = self.api_key.as_deref().unwrap_or_default();
        debug!("JSearch query '{query}' (limit {limit})");

        let response = self
            .client
            .get(JSEARCH_URL)
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", JSEARCH_HOST)
            .query(&[("query", query), ("page", "1"), ("num_pages", "1")])
            .send()
            .await?;

        take_items(read_json(response).await?, "/data", limit)
    }

    fn normalize(&self, raw: &Value) -> JobListing {
        let url = raw
            .get("job_apply_link")
            .filter(|v| v.as_str().is_some_and(|s| !s.is_empty()))
            .or_else(|| raw.get("job_google_link"));
        let location = raw
            .get("job_location")
            .filter(|v| v.is_string())
            .or_else(|| raw.get("job_city"));

        RawFields {
            id: raw.get("job_id"),
            title: raw.get("job_title"),
            company: raw.get("employer_name"),
            description: raw.get("job_description"),
            url,
            location,
        }
        .into_listing(self.name())
    }

    fn setup_hint(&self) -> &str {
        "RAPIDAPI_KEY (JSearch)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{NO_URL, UNKNOWN};
    use serde_json::json;

    fn provider() -> JSearchProvider {
        JSearchProvider::new(Client::new(), Some("key".to_string()))
    }

    #[test]
    fn test_normalize_full_listing() {
        let raw = json!({
            "job_id": "abc123==",
            "job_title": "Senior Rust Engineer",
            "employer_name": "Ferrous Systems",
            "job_description": "Build   reliable\nsystems.",
            "job_apply_link": "https://jobs.example.com/abc",
            "job_city": "Berlin",
            "job_country": "DE"
        });
        let listing = provider().normalize(&raw);
        assert_eq!(listing.id, "abc123==");
        assert_eq!(listing.title, "Senior Rust Engineer");
        assert_eq!(listing.company, "Ferrous Systems");
        assert_eq!(listing.description, "Build reliable systems.");
        assert_eq!(listing.url, "https://jobs.example.com/abc");
        assert_eq!(listing.source, "jsearch");
        assert_eq!(listing.location.as_deref(), Some("Berlin"));
    }

    #[test]
    fn test_normalize_falls_back_to_google_link() {
        let raw = json!({"job_apply_link": "", "job_google_link": "https://g.co/jobs/1"});
        assert_eq!(provider().normalize(&raw).url, "https://g.co/jobs/1");
    }

    #[test]
    fn test_normalize_sparse_listing() {
        let listing = provider().normalize(&json!({"job_title": null}));
        assert_eq!(listing.title, UNKNOWN);
        assert_eq!(listing.url, NO_URL);
    }

    #[test]
    fn test_unavailable_without_key() {
        assert!(!JSearchProvider::new(Client::new(), None).available());
    }
}
