//! SerpAPI (Google results) provider

use super::traits::*;
use crate::config::Credentials;
use crate::results::RawResult;
use anyhow::Result as AnyhowResult;

/// SerpAPI search.json endpoint
pub struct SerpApi {
    base_url: String,
}

impl SerpApi {
    pub fn new() -> Self {
        Self {
            base_url: "https://serpapi.com/search.json".to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for SerpApi {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for SerpApi {
    fn name(&self) -> &str {
        "serpapi"
    }

    fn required_credentials(&self) -> &'static [&'static str] {
        &["SERPAPI_KEY"]
    }

    fn weight(&self) -> f64 {
        1.1
    }

    fn request(&self, params: &RequestParams, credentials: &Credentials) -> AnyhowResult<ProviderRequest> {
        let key = require(credentials, "SERPAPI_KEY")?;

        Ok(ProviderRequest::get(&self.base_url)
            .header("Accept", "application/json")
            .param("engine", "google")
            .param("q", &params.query)
            .param("num", params.max_results.to_string())
            .param("api_key", key))
    }

    fn response(&self, response: ProviderResponse) -> AnyhowResult<Vec<RawResult>> {
        response.ensure_success()?;

        let json: serde_json::Value = response.json()?;
        if let Some(error) = json.get("error").and_then(|v| v.as_str()) {
            return Err(anyhow::anyhow!("serpapi error: {}", error));
        }

        let mut results: Vec<RawResult> = Vec::new();

        // Answer box first when present; it is usually the most direct snippet
        if let Some(answer) = json.get("answer_box") {
            let snippet = str_field(answer, "answer").or_else(|| str_field(answer, "snippet"));
            if snippet.is_some() {
                results.push(RawResult {
                    title: str_field(answer, "title"),
                    url: str_field(answer, "link"),
                    snippet,
                });
            }
        }

        if let Some(organic) = json.get("organic_results").and_then(|v| v.as_array()) {
            results.extend(organic.iter().map(|item| RawResult {
                title: str_field(item, "title"),
                url: str_field(item, "link"),
                snippet: str_field(item, "snippet"),
            }));
        }

        Ok(results)
    }
}
