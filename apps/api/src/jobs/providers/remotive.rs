//! Remotive public remote-jobs API. Needs no credentials; gated by
//! `REMOTIVE_ENABLED`.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::fallback::{Provider, ProviderError};
use crate::jobs::providers::{read_json, take_items, JobProvider};
use crate::models::job::{JobListing, RawFields};

const REMOTIVE_URL: &str = "https://remotive.com/api/remote-jobs";

#[derive(Clone)]
pub struct RemotiveProvider {
    client: Client,
    enabled: bool,
}

impl RemotiveProvider {
    pub fn new(client: Client, enabled: bool) -> Self {
        Self { client, enabled }
    }
}

impl Provider for RemotiveProvider {
    fn name(&self) -> &str {
        "remotive"
    }

    fn available(&self) -> bool {
        self.enabled
    }
}

#[async_trait]
impl JobProvider for RemotiveProvider {
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Value>, ProviderError> {
        let limit_param = limit.to_string();
        debug!("Remotive query '{query}' (limit {limit})");

        let response = self
            .client
            .get(REMOTIVE_URL)
            .query(&[("search", query), ("limit", limit_param.as_str())])
            .send()
            .await?;

        take_items(read_json(response).await?, "/jobs", limit)
    }

    fn normalize(&self, raw: &Value) -> JobListing {
        RawFields {
            id: raw.get("id"),
            title: raw.get("title"),
            company: raw.get("company_name"),
            description: raw.get("description"),
            url: raw.get("url"),
            location: raw.get("candidate_required_location"),
        }
        .into_listing(self.name())
    }

    fn setup_hint(&self) -> &str {
        "REMOTIVE_ENABLED=true (Remotive)"
    }
}
