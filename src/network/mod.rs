//! HTTP networking module
//!
//! Provides the shared HTTP client used by providers, the scrape fallback and
//! the generation backends.

mod client;
mod user_agent;

pub use client::HttpClient;
pub use user_agent::{generate_user_agent, GENERIC_BROWSER_UA};
