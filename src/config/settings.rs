//! Settings structures for HaloAI-RS configuration

use crate::answer::Mode;
use crate::search::Strategy;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main settings structure matching `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub search: SearchSettings,
    pub answer: AnswerSettings,
    pub providers: Vec<ProviderConfig>,
    /// Static credentials; environment variables take precedence per request
    pub credentials: HashMap<String, String>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("HALO_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("HALO_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("HALO_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("FALLBACK_MODEL") {
            if !val.trim().is_empty() {
                self.answer.model = val.trim().to_string();
            }
        }
        if let Ok(val) = std::env::var("OLLAMA_URL") {
            self.answer.local_url = val;
        }
        if let Ok(val) = std::env::var("OLLAMA_MODEL") {
            self.answer.local_model = val;
        }
    }

    /// Get provider config by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Assistant name used in prompts
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "HaloAI".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8787,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Web search behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Provider execution policy
    pub strategy: Strategy,
    /// Results requested from each provider
    pub max_results: usize,
    /// Per-provider call timeout in milliseconds
    pub timeout_ms: u64,
    /// Results kept after rescoring
    pub top_n: usize,
    /// Scrape target, `{query}` is replaced by the URL-encoded query
    pub fallback_url: String,
    /// Page fetch timeout in milliseconds
    pub page_timeout_ms: u64,
    /// Lifetime of cached page extractions in seconds
    pub page_cache_ttl: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            strategy: Strategy::Fastest,
            max_results: 5,
            timeout_ms: 2500,
            top_n: 4,
            fallback_url: "https://html.duckduckgo.com/html/?q={query}".to_string(),
            page_timeout_ms: 8000,
            page_cache_ttl: 300,
        }
    }
}

/// Answer composition and generation backends
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSettings {
    /// Default operating mode
    pub mode: Mode,
    /// Cloud model identifier
    pub model: String,
    /// Cloud chat-completions base URL
    pub cloud_url: String,
    /// Local generation server base URL
    pub local_url: String,
    /// Local model identifier
    pub local_model: String,
    /// Generation call timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for AnswerSettings {
    fn default() -> Self {
        Self {
            mode: Mode::Cloud,
            model: "gpt-4o-mini".to_string(),
            cloud_url: "https://api.openai.com".to_string(),
            local_url: "http://127.0.0.1:11434".to_string(),
            local_model: "llama3".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Individual provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name (unique identifier)
    pub name: String,
    /// Whether the provider is disabled regardless of credentials
    pub disabled: bool,
    /// Quality prior used by the rescorer
    pub weight: Option<f64>,
    /// Custom timeout for this provider in milliseconds
    pub timeout_ms: Option<u64>,
    /// Alternate API endpoint
    pub base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.search.max_results, 5);
        assert_eq!(settings.search.timeout_ms, 2500);
        assert_eq!(settings.search.top_n, 4);
        assert_eq!(settings.answer.mode, Mode::Cloud);
        assert!(settings.providers.is_empty());
    }

    #[test]
    fn test_yaml_sections_are_optional() {
        let yaml = r#"
search:
  strategy: accurate
providers:
  - name: brave
    weight: 1.5
credentials:
  BRAVE_API_KEY: abc
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.search.strategy, Strategy::Accurate);
        assert_eq!(settings.search.max_results, 5);
        assert_eq!(settings.get_provider("brave").unwrap().weight, Some(1.5));
        assert_eq!(settings.credentials.get("BRAVE_API_KEY").unwrap(), "abc");
    }
}
