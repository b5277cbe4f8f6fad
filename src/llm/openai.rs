//! OpenAI-compatible chat completions backend

use super::{GenerationBackend, GenerationError, GenerationRequest};
use crate::config::{Credentials, CLOUD_KEY};
use crate::network::HttpClient;
use crate::providers::ProviderRequest;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::warn;

pub struct OpenAiBackend {
    client: HttpClient,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiBackend {
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

    fn parse(status: u16, text: &str) -> Result<String, GenerationError> {
        let json: Option<serde_json::Value> = serde_json::from_str(text).ok();

        if let Some(message) = json
            .as_ref()
            .and_then(|j| j.pointer("/error/message"))
            .and_then(|v| v.as_str())
        {
            return Err(GenerationError::Backend(message.to_string()));
        }
        if !(200..300).contains(&status) {
            return Err(GenerationError::Http(status));
        }

        let json = json.ok_or_else(|| GenerationError::Parse("response is not JSON".to_string()))?;
        let content = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .trim();

        if content.is_empty() {
            Err(GenerationError::Empty)
        } else {
            Ok(content.to_string())
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn is_configured(&self, credentials: &Credentials) -> bool {
        credentials.has(CLOUD_KEY)
    }

    async fn complete(
        &self,
        request: GenerationRequest,
        credentials: &Credentials,
    ) -> Result<String, GenerationError> {
        let key = credentials
            .get(CLOUD_KEY)
            .ok_or_else(|| GenerationError::NotConfigured(CLOUD_KEY.to_string()))?;

        let body = json!({
            "model": request.model.clone().unwrap_or_else(|| self.model.clone()),
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "messages": request.messages,
        });

        let http_request = ProviderRequest::post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", key))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(body);

        let response = self
            .client
            .execute_with_timeout(http_request, self.timeout)
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        Self::parse(response.status, &response.text).map_err(|e| {
            warn!("Cloud generation failed: {}", e);
            e
        })
    }
}
