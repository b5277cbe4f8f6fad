//! Relevance rescoring of normalized snippets
//!
//! `score = (keyword_matches + min(len / 80, 2)) * provider_weight`

use super::types::SearchResult;
use std::collections::HashMap;

/// Results kept after rescoring when no limit is configured
pub const DEFAULT_TOP_N: usize = 4;

/// Weight of a provider with no known quality prior
pub const NEUTRAL_WEIGHT: f64 = 1.0;

/// Rescorer with per-provider weights, normally taken from the provider registry
#[derive(Debug, Clone, Default)]
pub struct Rescorer {
    weights: HashMap<String, f64>,
}

impl Rescorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with explicit provider weights
    pub fn with_weights(weights: HashMap<String, f64>) -> Self {
        Self { weights }
    }

    /// Effective weight for a provider
    pub fn weight(&self, provider: &str) -> f64 {
        self.weights
            .get(provider)
            .copied()
            .unwrap_or(NEUTRAL_WEIGHT)
    }

    /// Score a single snippet against the query
    pub fn score(&self, snippet: &str, query: &str, provider: &str) -> f64 {
        let text = snippet.to_lowercase();
        let query = query.to_lowercase();

        let keyword_matches = query
            .split_whitespace()
            .filter(|w| w.chars().count() > 3 && text.contains(*w))
            .count() as f64;

        let length_score = (snippet.chars().count() as f64 / 80.0).min(2.0);

        (keyword_matches + length_score) * self.weight(provider)
    }

    /// Score, sort descending (stable on ties) and keep the top `top_n`
    pub fn rescore(&self, results: Vec<SearchResult>, query: &str, top_n: usize) -> Vec<SearchResult> {
        let mut scored: Vec<SearchResult> = results
            .into_iter()
            .map(|mut r| {
                r.score = self.score(&r.snippet, query, &r.provider);
                r
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_n);
        scored
    }
}
