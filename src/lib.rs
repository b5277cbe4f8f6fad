//! HaloAI-RS: a retrieval-augmented answer engine
//!
//! Queries are answered from a loaded document, from web search providers
//! raced under a configurable strategy, or from a scrape of a public
//! results page, with cloud or local generation layered on top.

pub mod answer;
pub mod cache;
pub mod config;
pub mod document;
pub mod fallback;
pub mod llm;
pub mod metrics;
pub mod network;
pub mod providers;
pub mod query;
pub mod results;
pub mod search;
pub mod summarize;
pub mod web;

pub use answer::{Answer, AnswerContext, AnswerOrchestrator, AnswerPath, Mode};
pub use config::{Credentials, Settings};
pub use providers::Provider;
pub use results::SearchResult;
pub use search::{RaceEngine, SearchQuery, Strategy};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
