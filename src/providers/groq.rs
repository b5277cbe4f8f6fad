//! Groq quick-answer provider
//!
//! Not a search index: asks a small hosted model for a short web-style answer
//! and surfaces it as a single snippet without a URL.

use super::traits::*;
use crate::config::Credentials;
use crate::results::RawResult;
use anyhow::Result as AnyhowResult;
use serde_json::json;

pub struct Groq {
    base_url: String,
    model: String,
}

impl Groq {
    pub fn new() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::new()
        }
    }
}

impl Default for Groq {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for Groq {
    fn name(&self) -> &str {
        "groq"
    }

    fn required_credentials(&self) -> &'static [&'static str] {
        &["GROQ_API_KEY"]
    }

    fn weight(&self) -> f64 {
        0.9
    }

    fn request(&self, params: &RequestParams, credentials: &Credentials) -> AnyhowResult<ProviderRequest> {
        let key = require(credentials, "GROQ_API_KEY")?;

        let body = json!({
            "model": self.model,
            "temperature": 0.2,
            "max_tokens": 120,
            "messages": [{
                "role": "user",
                "content": format!("Web-style quick answer for:\n\"{}\"\nShort sentences only.", params.query),
            }],
        });

        Ok(ProviderRequest::post(&self.base_url)
            .header("Authorization", format!("Bearer {}", key))
            .header("Accept", "application/json")
            .json(body))
    }

    fn response(&self, response: ProviderResponse) -> AnyhowResult<Vec<RawResult>> {
        response.ensure_success()?;

        let json: serde_json::Value = response.json()?;
        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .trim();

        if text.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![RawResult {
            title: Some("Groq Quick Answer".to_string()),
            url: Some(String::new()),
            snippet: Some(text.to_string()),
        }])
    }
}
