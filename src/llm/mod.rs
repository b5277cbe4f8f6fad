//! Text-generation backends
//!
//! The orchestrator treats generation as `complete(request) -> text`. Every
//! failure mode is a [`GenerationError`] so callers can move on to their next
//! fallback tier.

mod ollama;
mod openai;

pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

use crate::config::Credentials;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors from a generation call
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// A required credential or endpoint is missing
    #[error("backend not configured: {0}")]
    NotConfigured(String),

    /// The backend answered with a non-2xx status
    #[error("HTTP error: {0}")]
    Http(u16),

    /// The response body could not be understood
    #[error("parse error: {0}")]
    Parse(String),

    /// The backend reported an error in its payload
    #[error("backend error: {0}")]
    Backend(String),

    /// The backend answered without any content
    #[error("empty completion")]
    Empty,

    /// The request never completed
    #[error("transport error: {0}")]
    Transport(String),
}

/// One role-tagged message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A completion request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Backend default when unset
    pub model: Option<String>,
}

impl GenerationRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: 0.7,
            max_tokens: 350,
            model: None,
        }
    }

    /// Single user message
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(text)])
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// All message contents as one prompt, for single-prompt backends
    pub fn prompt_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A text-generation service
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the backend can be called with these credentials
    fn is_configured(&self, credentials: &Credentials) -> bool;

    async fn complete(
        &self,
        request: GenerationRequest,
        credentials: &Credentials,
    ) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_text_joins_messages() {
        let request = GenerationRequest::new(vec![
            ChatMessage::system("You are HaloAI."),
            ChatMessage::user("Hello"),
        ]);
        assert_eq!(request.prompt_text(), "You are HaloAI.\n\nHello");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(GenerationError::Http(429).to_string(), "HTTP error: 429");
        assert_eq!(GenerationError::Empty.to_string(), "empty completion");
    }
}
