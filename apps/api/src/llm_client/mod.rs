//! LLM backends used by the analysis chain.
//!
//! Each backend wraps one hosted model behind [`LlmBackend`]. Backends are
//! never called directly by handlers; they are ordered into a fallback chain
//! by `analysis::TextAnalyzer`.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::fallback::{Provider, ProviderError};

pub mod gemini;
pub mod groq;
pub mod prompts;

pub use gemini::GeminiBackend;
pub use groq::GroqBackend;

const MAX_RETRIES: u32 = 3;

/// Code-fence openers stripped from model output, most specific first.
const KNOWN_OPENERS: &[&str] = &["```json", "```JSON", "```"];
const FENCE: &str = "```";

/// A hosted model that turns a prompt into text.
#[async_trait]
pub trait LlmBackend: Provider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ProviderError>;
}

/// Sends a request, retrying on 429 (rate limit) and 5xx errors with
/// exponential backoff. Other non-success statuses fail immediately.
pub(crate) async fn send_with_retry<F>(backend: &str, build: F) -> Result<Response, ProviderError>
where
    F: Fn() -> RequestBuilder,
{
    let mut last_error: Option<ProviderError> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            // Exponential backoff: 1s, 2s
            let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
            warn!(
                "{backend} call attempt {} failed, retrying after {}ms...",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = match build().send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(ProviderError::Http(e));
                continue;
            }
        };

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("{backend} API returned {}: {}", status, body);
            last_error = Some(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        debug!("{backend} call succeeded on attempt {}", attempt + 1);
        return Ok(response);
    }

    Err(last_error.unwrap_or(ProviderError::RateLimited {
        retries: MAX_RETRIES,
    }))
}

/// Unwraps a known code-fence wrapper; text without one is returned trimmed.
pub fn unwrap_delimited(text: &str) -> &str {
    let text = text.trim();
    for opener in KNOWN_OPENERS {
        if let Some(stripped) = text.strip_prefix(opener) {
            let stripped = stripped.trim_start();
            return stripped
                .strip_suffix(FENCE)
                .map(str::trim)
                .unwrap_or(stripped);
        }
    }
    text
}

/// Unwraps and deserializes model output. Only a JSON object is accepted.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, ProviderError> {
    let raw = unwrap_delimited(text);
    if raw.is_empty() {
        return Err(ProviderError::EmptyContent);
    }
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(ProviderError::Malformed(
            "expected a JSON object".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}
