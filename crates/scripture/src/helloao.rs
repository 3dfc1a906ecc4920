// FILE: crates/scripture/src/helloao.rs

use crate::cache::ChapterText;
use crate::error::{ScriptureError, ScriptureResult};
use crate::provider::ScriptureProvider;
use crate::retry::{with_retry, RetryPolicy};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration as StdDuration;

/// Free Use Bible API (bible.helloao.org) provider
///
/// Chapters come from `{base}/{translation}/{BOOK}/{chapter}.json`.
pub struct HelloAoProvider {
    base_url: String,
    client: Option<reqwest::blocking::Client>,
    retry: RetryPolicy,
}

impl HelloAoProvider {
    pub const API_BASE: &'static str = "https://bible.helloao.org/api";
    const NAME: &'static str = "helloao";

    /// Create a provider against the public API
    pub fn new() -> Self {
        Self::with_base_url(Self::API_BASE)
    }

    /// Create a provider against another deployment of the same API
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(StdDuration::from_secs(10))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION"),
            ))
            .build()
            .ok();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn chapter_url(&self, translation: &str, book_id: &str, chapter: u32) -> String {
        format!("{}/{}/{}/{}.json", self.base_url, translation, book_id, chapter)
    }

    fn request_chapter(&self, translation: &str, book_id: &str, chapter: u32) -> ScriptureResult<ChapterText> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ScriptureError::Network("HTTP client not available".to_string()))?;

        let url = self.chapter_url(translation, book_id, chapter);
        let response = client
            .get(&url)
            .send()
            .map_err(|e| ScriptureError::Network(format!("Request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(ScriptureError::NotFound {
                    reference: format!("{} {}", book_id, chapter),
                    translation: translation.to_string(),
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ScriptureError::Unauthorized(Self::NAME.to_string()))
            }
            status => {
                return Err(ScriptureError::Network(format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )))
            }
        }

        let body: ChapterResponse = response.json().map_err(|e| ScriptureError::InvalidResponse {
            provider: Self::NAME.to_string(),
            details: format!("JSON parse error: {}", e),
        })?;

        body.into_chapter_text()
    }
}

impl Default for HelloAoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptureProvider for HelloAoProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fetch_chapter(&self, translation: &str, book_id: &str, chapter: u32) -> ScriptureResult<ChapterText> {
        with_retry(&self.retry, || self.request_chapter(translation, book_id, chapter))
    }
}

#[derive(Debug, Deserialize)]
struct ChapterResponse {
    chapter: ChapterBody,
}

#[derive(Debug, Deserialize)]
struct ChapterBody {
    content: Vec<ChapterContent>,
}

#[derive(Debug, Deserialize)]
struct ChapterContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    number: Option<u32>,
    #[serde(default)]
    content: Vec<Value>,
}

impl ChapterResponse {
    fn into_chapter_text(self) -> ScriptureResult<ChapterText> {
        let text: ChapterText = self
            .chapter
            .content
            .into_iter()
            .filter(|c| c.kind == "verse")
            .filter_map(|c| Some((c.number?, verse_text(&c.content))))
            .collect();

        if text.is_empty() {
            return Err(ScriptureError::InvalidResponse {
                provider: HelloAoProvider::NAME.to_string(),
                details: "chapter contains no verses".to_string(),
            });
        }
        Ok(text)
    }
}

/// Joins verse segments: plain strings and `{ "text": ... }` objects carry
/// text; footnote markers and line breaks are dropped
fn verse_text(segments: &[Value]) -> String {
    let words: Vec<&str> = segments
        .iter()
        .filter_map(|seg| match seg {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("text").and_then(Value::as_str),
            _ => None,
        })
        .flat_map(str::split_whitespace)
        .collect();
    words.join(" ")
}
