//! Result type definitions

use serde::{Deserialize, Serialize};

/// Backend-specific result, before normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    pub title: Option<String>,
    pub url: Option<String>,
    pub snippet: Option<String>,
}

impl RawResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            url: Some(url.into()),
            snippet: Some(snippet.into()),
        }
    }
}

/// Canonical search result surfaced to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result
    pub title: String,
    /// The URL of the result (may be empty for answer-style providers)
    pub url: String,
    /// Content snippet, never empty
    pub snippet: String,
    /// Provider that returned this result
    pub provider: String,
    /// Latency of the provider call that produced it
    pub latency_ms: u64,
    /// Relevance score, assigned by the rescorer
    #[serde(default)]
    pub score: f64,
}

impl SearchResult {
    /// Normalize a raw result; `None` when the snippet is empty
    pub fn from_raw(raw: RawResult, provider: &str, latency_ms: u64) -> Option<Self> {
        let snippet = raw.snippet.unwrap_or_default().trim().to_string();
        if snippet.is_empty() {
            return None;
        }

        Some(Self {
            title: raw.title.unwrap_or_default().trim().to_string(),
            url: raw.url.unwrap_or_default().trim().to_string(),
            snippet,
            provider: provider.to_string(),
            latency_ms,
            score: 0.0,
        })
    }
}

/// Normalize a provider's raw list, dropping results without a snippet
pub fn normalize(raw: Vec<RawResult>, provider: &str, latency_ms: u64) -> Vec<SearchResult> {
    raw.into_iter()
        .filter_map(|r| SearchResult::from_raw(r, provider, latency_ms))
        .collect()
}
