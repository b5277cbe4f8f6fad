//! Search query and strategy models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Provider execution policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Race every enabled provider, first non-empty answer wins
    #[default]
    Fastest,
    /// Try providers one at a time, cheapest first
    Cheapest,
    /// Try providers one at a time, best quality first
    Accurate,
}

impl Strategy {
    /// Read `SEARCH_MODE`; `None` when unset or unrecognised
    pub fn from_env() -> Option<Self> {
        std::env::var("SEARCH_MODE").ok()?.parse().ok()
    }

    /// Provider order for the sequential strategies
    pub fn order(&self) -> &'static [&'static str] {
        match self {
            Strategy::Fastest => &[],
            Strategy::Cheapest => &["google_pse", "bing", "serpapi", "brave", "groq"],
            Strategy::Accurate => &["bing", "serpapi", "google_pse", "brave", "groq"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Fastest => "fastest",
            Strategy::Cheapest => "cheapest",
            Strategy::Accurate => "accurate",
        }
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fastest" | "race" => Ok(Strategy::Fastest),
            "cheapest" | "cheap" => Ok(Strategy::Cheapest),
            "accurate" | "quality" => Ok(Strategy::Accurate),
            other => Err(anyhow::anyhow!("unknown search strategy: {}", other)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single web search request
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// The search query string
    pub query: String,
    /// Results requested from each provider
    pub max_results: usize,
    /// Per-provider timeout; engine default when unset
    pub timeout: Option<Duration>,
    /// Execution policy
    pub strategy: Strategy,
}

impl SearchQuery {
    /// Create a query with default limits
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: 5,
            timeout: None,
            strategy: Strategy::default(),
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check if query is empty
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }
}
