//! Brave Search API provider

use super::traits::*;
use crate::config::Credentials;
use crate::results::RawResult;
use anyhow::Result as AnyhowResult;

/// Brave web search API
pub struct Brave {
    base_url: String,
}

impl Brave {
    pub fn new() -> Self {
        Self {
            base_url: "https://api.search.brave.com/res/v1/web/search".to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for Brave {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for Brave {
    fn name(&self) -> &str {
        "brave"
    }

    fn required_credentials(&self) -> &'static [&'static str] {
        &["BRAVE_API_KEY"]
    }

    fn request(&self, params: &RequestParams, credentials: &Credentials) -> AnyhowResult<ProviderRequest> {
        let key = require(credentials, "BRAVE_API_KEY")?;

        Ok(ProviderRequest::get(&self.base_url)
            .header("X-Subscription-Token", key)
            .header("Accept", "application/json")
            .param("q", &params.query)
            .param("count", params.max_results.to_string()))
    }

    fn response(&self, response: ProviderResponse) -> AnyhowResult<Vec<RawResult>> {
        response.ensure_success()?;

        let json: serde_json::Value = response.json()?;
        let results = json
            .pointer("/web/results")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .map(|item| RawResult {
                        title: str_field(item, "title"),
                        url: str_field(item, "url"),
                        snippet: str_field(item, "description"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brave_request() {
        let brave = Brave::new();
        let creds = Credentials::new().with("BRAVE_API_KEY", "t");
        let request = brave.request(&RequestParams::new("rust programming"), &creds).unwrap();

        assert!(request.url.contains("brave.com"));
        assert_eq!(request.headers["X-Subscription-Token"], "t");
        assert!(request.params.iter().any(|(k, _)| k == "q"));
    }

    #[test]
    fn test_brave_response_uses_description() {
        let brave = Brave::new();
        let response = ProviderResponse {
            status: 200,
            text: r#"{"web":{"results":[{"title":"T","url":"https://t.example","description":"desc"}]}}"#
                .to_string(),
            url: String::new(),
        };
        let results = brave.response(response).unwrap();
        assert_eq!(results[0].snippet.as_deref(), Some("desc"));
    }
}
