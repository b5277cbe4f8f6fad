//! Provider traits and request/response types

use crate::config::Credentials;
use crate::network::HttpClient;
use crate::results::RawResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Parameters for a provider search
#[derive(Debug, Clone)]
pub struct RequestParams {
    /// Search query string
    pub query: String,
    /// Number of results to ask for
    pub max_results: usize,
    /// Upper bound for the call
    pub timeout: Duration,
}

impl RequestParams {
    /// Create new request parameters
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: 5,
            timeout: Duration::from_millis(2500),
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP request to be made for a provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters
    pub params: Vec<(String, String)>,
    /// JSON body
    pub json: Option<serde_json::Value>,
}

impl ProviderRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: HashMap::new(),
            params: Vec::new(),
            json: None,
        }
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url)
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add JSON body
    pub fn json(mut self, data: serde_json::Value) -> Self {
        self.json = Some(data);
        self
    }

    /// Check whether a header was set, ignoring case
    pub fn has_header(&self, key: &str) -> bool {
        self.headers.keys().any(|k| k.eq_ignore_ascii_case(key))
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP response from a provider request
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl ProviderResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> anyhow::Result<T> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with the status code unless the response is 2xx
    pub fn ensure_success(&self) -> anyhow::Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(anyhow::anyhow!("HTTP error: {}", self.status))
        }
    }
}

/// A pluggable web-search backend
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Credentials that must all be present for the provider to run
    fn required_credentials(&self) -> &'static [&'static str];

    /// Quality prior used when rescoring snippets
    fn weight(&self) -> f64 {
        1.0
    }

    /// Whether the provider can run with the given credentials
    fn is_enabled(&self, credentials: &Credentials) -> bool {
        credentials.has_all(self.required_credentials())
    }

    /// Build the HTTP request for a search
    fn request(
        &self,
        params: &RequestParams,
        credentials: &Credentials,
    ) -> anyhow::Result<ProviderRequest>;

    /// Parse the HTTP response into raw results
    fn response(&self, response: ProviderResponse) -> anyhow::Result<Vec<RawResult>>;

    /// Run a search end to end
    async fn search(
        &self,
        client: &HttpClient,
        params: &RequestParams,
        credentials: &Credentials,
    ) -> anyhow::Result<Vec<RawResult>> {
        let request = self.request(params, credentials)?;
        let response = client.execute_with_timeout(request, params.timeout).await?;
        self.response(response)
    }
}

/// Read a required credential or fail with its name
pub(crate) fn require<'a>(credentials: &'a Credentials, key: &str) -> anyhow::Result<&'a str> {
    credentials
        .get(key)
        .ok_or_else(|| anyhow::anyhow!("missing credential {}", key))
}

/// Read a string field from a JSON object
pub(crate) fn str_field(value: &serde_json::Value, key: &str) -> Option<String> {
    value.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ProviderRequest::get("https://example.com/search")
            .header("X-Subscription-Token", "t")
            .param("q", "rust");
        assert_eq!(request.method, HttpMethod::Get);
        assert!(request.has_header("x-subscription-token"));
        assert_eq!(request.params, vec![("q".to_string(), "rust".to_string())]);
    }

    #[test]
    fn test_response_status() {
        let response = ProviderResponse {
            status: 429,
            text: String::new(),
            url: String::new(),
        };
        assert!(!response.is_success());
        assert!(response.ensure_success().is_err());
    }
}
