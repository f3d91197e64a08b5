use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Provider credentials are optional: a missing key disables that provider.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub groq_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub rapidapi_key: Option<String>,
    pub adzuna_app_id: Option<String>,
    pub adzuna_app_key: Option<String>,
    pub adzuna_country: String,
    pub remotive_enabled: bool,
    /// Timeout for job providers and page scraping.
    pub provider_timeout_secs: u64,
    pub llm_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            groq_api_key: optional_env("GROQ_API_KEY"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            rapidapi_key: optional_env("RAPIDAPI_KEY"),
            adzuna_app_id: optional_env("ADZUNA_APP_ID"),
            adzuna_app_key: optional_env("ADZUNA_APP_KEY"),
            adzuna_country: optional_env("ADZUNA_COUNTRY").unwrap_or_else(|| "us".to_string()),
            remotive_enabled: parse_env("REMOTIVE_ENABLED", true)?,
            provider_timeout_secs: parse_env("PROVIDER_TIMEOUT_SECS", 10)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 60)?,
        })
    }
}

/// Blank values are treated the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration with every provider disabled.
    pub fn for_tests() -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            groq_api_key: None,
            gemini_api_key: None,
            rapidapi_key: None,
            adzuna_app_id: None,
            adzuna_app_key: None,
            adzuna_country: "us".to_string(),
            remotive_enabled: false,
            provider_timeout_secs: 10,
            llm_timeout_secs: 60,
        }
    }
}
