//! Job posting page fetch and readable-text extraction.

use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::head;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
/// Scraped content is capped at this many characters.
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// Containers tried in order; the first present one holds the posting.
const CONTENT_SELECTORS: &[&str] = &["main", "article", "body"];
/// Elements whose text is never part of the posting.
const EXCLUDED_TAGS: &[&str] = &["script", "style", "nav", "footer", "header", "noscript"];

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("failed to fetch page: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("page has no readable content")]
    Empty,
}

/// Fetches job posting pages and extracts their readable text.
#[derive(Clone)]
pub struct JobPageScraper {
    client: Client,
}

impl JobPageScraper {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub async fn scrape(&self, url: &str) -> Result<String, ScrapeError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ScrapeError::InvalidUrl(url.to_string()));
        }
        info!("Fetching job post: {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ScrapeError::Status(response.status().as_u16()));
        }
        let html = response.text().await?;

        let content = extract_content(&html);
        if content.is_empty() {
            warn!("No readable content at {url}");
            return Err(ScrapeError::Empty);
        }
        Ok(content)
    }
}

/// Readable text of the main content container, one line per text run.
pub fn extract_content(html: &str) -> String {
    let document = Html::parse_document(html);

    let Some(container) = CONTENT_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| document.select(&selector).next())
    else {
        return String::new();
    };

    let text = visible_lines(container).join("\n");
    head(text.trim(), MAX_CONTENT_CHARS).to_string()
}

fn visible_lines(container: ElementRef<'_>) -> Vec<String> {
    container
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| EXCLUDED_TAGS.contains(&e.name()))
            });
            let line = text.trim();
            (!hidden && !line.is_empty()).then(|| line.to_string())
        })
        .collect()
}
