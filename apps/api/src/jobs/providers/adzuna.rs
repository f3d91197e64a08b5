//! Adzuna provider. Requires both `ADZUNA_APP_ID` and `ADZUNA_APP_KEY`.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::fallback::{Provider, ProviderError};
use crate::jobs::providers::{read_json, take_items, JobProvider};
use crate::models::job::{JobListing, RawFields};

const ADZUNA_API_BASE: &str = "https://api.adzuna.com/v1/api/jobs";
/// Adzuna rejects larger pages.
const MAX_RESULTS_PER_PAGE: usize = 50;

#[derive(Debug, Clone)]
struct Credentials {
    app_id: String,
    app_key: String,
}

#[derive(Clone)]
pub struct AdzunaProvider {
    client: Client,
    credentials: Option<Credentials>,
    country: String,
}

impl AdzunaProvider {
    pub fn new(
        client: Client,
        app_id: Option<String>,
        app_key: Option<String>,
        country: String,
    ) -> Self {
        let credentials = app_id
            .zip(app_key)
            .map(|(app_id, app_key)| Credentials { app_id, app_key });
        Self {
            client,
            credentials,
            country: country.to_lowercase(),
        }
    }
}

impl Provider for AdzunaProvider {
    fn name(&self) -> &str {
        "adzuna"
    }

    fn available(&self) -> bool {
        self.credentials.is_some()
    }
}

#[async_trait]
impl JobProvider for AdzunaProvider {
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Value>, ProviderError> {
        let Some(credentials) = &self.credentials else {
            return Err(ProviderError::Malformed("credentials missing".to_string()));
        };
        let per_page = limit.clamp(1, MAX_RESULTS_PER_PAGE).to_string();
        let url = format!("{ADZUNA_API_BASE}/{}/search/1", self.country);
        debug!("Adzuna query '{query}' (limit {limit}, country {})", self.country);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("app_id", credentials.app_id.as_str()),
                ("app_key", credentials.app_key.as_str()),
                ("results_per_page", per_page.as_str()),
                ("what", query),
                ("content-type", "application/json"),
            ])
            .send()
            .await?;

        take_items(read_json(response).await?, "/results", limit)
    }

    fn normalize(&self, raw: &Value) -> JobListing {
        RawFields {
            id: raw.get("id"),
            title: raw.get("title"),
            company: raw.pointer("/company/display_name"),
            description: raw.get("description"),
            url: raw.get("redirect_url"),
            location: raw.pointer("/location/display_name"),
        }
        .into_listing(self.name())
    }

    fn setup_hint(&self) -> &str {
        "ADZUNA_APP_ID and ADZUNA_APP_KEY (Adzuna)"
    }
}
