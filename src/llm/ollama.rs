//! Local generation server backend (`/api/generate`)

use super::{GenerationBackend, GenerationError, GenerationRequest};
use crate::config::Credentials;
use crate::network::HttpClient;
use crate::providers::ProviderRequest;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

pub struct OllamaBackend {
    client: HttpClient,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaBackend {
    pub fn new(client: HttpClient, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accepts a single JSON object or newline-delimited streamed chunks
    fn parse(text: &str) -> Result<String, GenerationError> {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
            if let Some(error) = json.get("error").and_then(|v| v.as_str()) {
                return Err(GenerationError::Backend(error.to_string()));
            }
            let response = json
                .get("response")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .trim();
            return if response.is_empty() {
                Err(GenerationError::Empty)
            } else {
                Ok(response.to_string())
            };
        }

        let lines: Vec<serde_json::Value> = text
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();
        if lines.is_empty() {
            return Err(GenerationError::Parse("response is not JSON".to_string()));
        }

        let merged: String = lines
            .iter()
            .filter_map(|j| j.get("response").and_then(|v| v.as_str()))
            .collect();
        let merged = merged.trim();

        if merged.is_empty() {
            Err(GenerationError::Empty)
        } else {
            Ok(merged.to_string())
        }
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    fn is_configured(&self, _credentials: &Credentials) -> bool {
        !self.base_url.is_empty()
    }

    async fn complete(
        &self,
        request: GenerationRequest,
        _credentials: &Credentials,
    ) -> Result<String, GenerationError> {
        if self.base_url.is_empty() {
            return Err(GenerationError::NotConfigured("local generation URL".to_string()));
        }

        let body = json!({
            "model": request.model.clone().unwrap_or_else(|| self.model.clone()),
            "prompt": request.prompt_text(),
            "stream": false,
            "options": {
                "num_predict": request.max_tokens,
                "temperature": request.temperature,
                "top_k": 40,
                "top_p": 0.9,
            },
        });

        let http_request = ProviderRequest::post(format!("{}/api/generate", self.base_url))
            .header("Content-Type", "application/json")
            .json(body);

        let response = self
            .client
            .execute_with_timeout(http_request, self.timeout)
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(GenerationError::Http(response.status));
        }

        Self::parse(&response.text)
    }
}
