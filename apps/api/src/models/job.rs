//! The common job-listing shape every provider normalizes into, plus the
//! shaping helpers providers share.

use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for missing text fields.
pub const UNKNOWN: &str = "Unknown";
/// Placeholder for a missing link.
pub const NO_URL: &str = "#";
/// Descriptions longer than this are cut and marked with [`TRUNCATION_MARKER`].
pub const MAX_DESCRIPTION_CHARS: usize = 300;
pub const TRUNCATION_MARKER: &str = "...";

/// Sentinel sources used when no real listing could be produced.
pub const SETUP_GUIDE_SOURCE: &str = "Setup Guide";
pub const SYSTEM_MESSAGE_SOURCE: &str = "System Message";

/// A job posting from any provider. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    /// Unique within one response only.
    pub id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub location: Option<String>,
}

impl JobListing {
    /// A synthetic listing explaining why no jobs were returned.
    pub fn sentinel(source: &str, title: &str, description: &str) -> Self {
        Self {
            id: format!("{}-0", slug(source)),
            title: title.to_string(),
            company: source.to_string(),
            description: description.to_string(),
            url: NO_URL.to_string(),
            source: source.to_string(),
            location: None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.source == SETUP_GUIDE_SOURCE || self.source == SYSTEM_MESSAGE_SOURCE
    }
}

/// Raw provider fields, looked up by JSON pointer, before shaping.
#[derive(Debug, Default)]
pub struct RawFields<'a> {
    pub id: Option<&'a Value>,
    pub title: Option<&'a Value>,
    pub company: Option<&'a Value>,
    pub description: Option<&'a Value>,
    pub url: Option<&'a Value>,
    pub location: Option<&'a Value>,
}

impl RawFields<'_> {
    /// Shapes raw fields into a listing, filling placeholders.
    /// An empty id is left for the aggregator to assign.
    pub fn into_listing(self, source: &str) -> JobListing {
        JobListing {
            id: self.id.and_then(scalar_to_string).unwrap_or_default(),
            title: text_or_unknown(self.title),
            company: text_or_unknown(self.company),
            description: self
                .description
                .and_then(Value::as_str)
                .map(|d| truncate_description(&strip_html(d)))
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            url: self
                .url
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(String::from)
                .unwrap_or_else(|| NO_URL.to_string()),
            source: source.to_string(),
            location: self
                .location
                .and_then(Value::as_str)
                .map(collapse_whitespace)
                .filter(|l| !l.is_empty()),
        }
    }
}

fn text_or_unknown(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Strings pass through; numbers are rendered. Anything else is absent.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of an HTML fragment, whitespace collapsed. Plain text passes through.
pub fn strip_html(fragment: &str) -> String {
    if !fragment.contains('<') {
        return collapse_whitespace(fragment);
    }
    let parsed = Html::parse_fragment(fragment);
    let text = parsed.root_element().text().collect::<Vec<_>>().join(" ");
    collapse_whitespace(&text)
}

/// Cuts to [`MAX_DESCRIPTION_CHARS`] characters, appending the marker when cut.
pub fn truncate_description(text: &str) -> String {
    if text.chars().count() <= MAX_DESCRIPTION_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_DESCRIPTION_CHARS).collect();
    format!("{}{TRUNCATION_MARKER}", cut.trim_end())
}

pub fn slug(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
