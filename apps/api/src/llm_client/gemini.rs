//! Secondary backend: Google Gemini `generateContent`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::fallback::{Provider, ProviderError};
use crate::llm_client::{send_with_retry, LlmBackend};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const MODEL: &str = "gemini-1.5-flash";
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[derive(Clone)]
pub struct GeminiBackend {
    client: Client,
    api_key: Option<String>,
}

impl GeminiBackend {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

impl Provider for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn available(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().unwrap_or_default();
        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");
        let body = GenerateRequest {
            system_instruction: Content {
                parts: vec![Part { text: system }],
            },
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        let response = send_with_retry(self.name(), || {
            self.client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&body)
        })
        .await?;

        let parsed: GenerateResponse = response.json().await?;
        parsed.into_text().ok_or(ProviderError::EmptyContent)
    }
}
