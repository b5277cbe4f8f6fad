//! Bing Web Search API provider

use super::traits::*;
use crate::config::Credentials;
use crate::results::RawResult;
use anyhow::Result as AnyhowResult;

/// Bing Web Search v7
pub struct Bing {
    base_url: String,
}

impl Bing {
    pub fn new() -> Self {
        Self {
            base_url: "https://api.bing.microsoft.com/v7.0/search".to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for Bing {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for Bing {
    fn name(&self) -> &str {
        "bing"
    }

    fn required_credentials(&self) -> &'static [&'static str] {
        &["BING_API_KEY"]
    }

    fn weight(&self) -> f64 {
        1.2
    }

    fn request(&self, params: &RequestParams, credentials: &Credentials) -> AnyhowResult<ProviderRequest> {
        let key = require(credentials, "BING_API_KEY")?;

        Ok(ProviderRequest::get(&self.base_url)
            .header("Ocp-Apim-Subscription-Key", key)
            .header("Accept", "application/json")
            .param("q", &params.query)
            .param("count", params.max_results.to_string())
            .param("textFormat", "Raw"))
    }

    fn response(&self, response: ProviderResponse) -> AnyhowResult<Vec<RawResult>> {
        response.ensure_success()?;

        let json: serde_json::Value = response.json()?;
        let results = json
            .pointer("/webPages/value")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .map(|item| RawResult {
                        title: str_field(item, "name"),
                        url: str_field(item, "url"),
                        snippet: str_field(item, "snippet"),
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
    fn test_bing_request() {
        let bing = Bing::new();
        let creds = Credentials::new().with("BING_API_KEY", "k");
        let request = bing
            .request(&RequestParams::new("rust programming"), &creds)
            .unwrap();

        assert!(request.url.contains("bing.microsoft.com"));
        assert_eq!(request.headers["Ocp-Apim-Subscription-Key"], "k");
        assert!(request.params.contains(&("count".to_string(), "5".to_string())));
    }

    #[test]
    fn test_bing_request_without_key_fails() {
        let bing = Bing::new();
        assert!(bing
            .request(&RequestParams::new("rust"), &Credentials::new())
            .is_err());
    }

    #[test]
    fn test_bing_response() {
        let bing = Bing::new();
        let response = ProviderResponse {
            status: 200,
            text: r#"{"webPages":{"value":[{"name":"Rust","url":"https://rust-lang.org","snippet":"A language."},{"name":"No snippet"}]}}"#.to_string(),
            url: String::new(),
        };
        let results = bing.response(response).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url.as_deref(), Some("https://rust-lang.org"));
        assert_eq!(results[1].snippet, None);
    }
}
