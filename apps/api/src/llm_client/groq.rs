//! Primary backend: Groq's OpenAI-compatible chat completions API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::fallback::{Provider, ProviderError};
use crate::llm_client::{send_with_retry, LlmBackend};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Hardcoded so every deployment scores with the same model.
pub const MODEL: &str = "llama-3.3-70b-versatile";
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Clone)]
pub struct GroqBackend {
    client: Client,
    api_key: Option<String>,
}

impl GroqBackend {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

impl Provider for GroqBackend {
    fn name(&self) -> &str {
        "groq"
    }

    fn available(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl LlmBackend for GroqBackend {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().unwrap_or_default();
        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = send_with_retry(self.name(), || {
            self.client.post(GROQ_API_URL).bearer_auth(api_key).json(&body)
        })
        .await?;

        let parsed: ChatResponse = response.json().await?;
        parsed.into_text().ok_or(ProviderError::EmptyContent)
    }
}
