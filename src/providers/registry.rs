//! Provider registry
//!
//! Holds every known provider in declaration order and decides, per call,
//! which of them can run with the credentials of that call.

use super::traits::Provider;
use super::{Bing, Brave, GooglePse, Groq, SerpApi};
use crate::config::{Credentials, ProviderConfig, Settings};
use crate::results::NEUTRAL_WEIGHT;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

/// Registry of all available providers
pub struct ProviderRegistry {
    /// Providers in declaration order
    providers: Vec<Arc<dyn Provider>>,
    /// Provider configurations by name
    configs: HashMap<String, ProviderConfig>,
    /// Providers already reported as missing credentials
    warned: Mutex<HashSet<String>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            configs: HashMap::new(),
            warned: Mutex::new(HashSet::new()),
        }
    }

    /// Registry with the built-in providers, configured from settings
    pub fn with_defaults(settings: &Settings) -> Self {
        let mut registry = Self::new();

        let base_url = |name: &str| {
            settings
                .get_provider(name)
                .and_then(|c| c.base_url.clone())
        };

        let bing: Arc<dyn Provider> = match base_url("bing") {
            Some(url) => Arc::new(Bing::with_base_url(url)),
            None => Arc::new(Bing::new()),
        };
        let serpapi: Arc<dyn Provider> = match base_url("serpapi") {
            Some(url) => Arc::new(SerpApi::with_base_url(url)),
            None => Arc::new(SerpApi::new()),
        };
        let google_pse: Arc<dyn Provider> = match base_url("google_pse") {
            Some(url) => Arc::new(GooglePse::with_base_url(url)),
            None => Arc::new(GooglePse::new()),
        };
        let brave: Arc<dyn Provider> = match base_url("brave") {
            Some(url) => Arc::new(Brave::with_base_url(url)),
            None => Arc::new(Brave::new()),
        };
        let groq: Arc<dyn Provider> = match base_url("groq") {
            Some(url) => Arc::new(Groq::with_base_url(url)),
            None => Arc::new(Groq::new()),
        };

        for provider in [bing, serpapi, google_pse, brave, groq] {
            let config = settings
                .get_provider(provider.name())
                .cloned()
                .unwrap_or_else(|| ProviderConfig {
                    name: provider.name().to_string(),
                    ..Default::default()
                });
            registry.register(provider, config);
        }

        registry
    }

    /// Register a provider; later registrations come later in every order
    pub fn register(&mut self, provider: Arc<dyn Provider>, config: ProviderConfig) {
        let name = provider.name().to_string();
        self.providers.retain(|p| p.name() != name);
        self.providers.push(provider);
        self.configs.insert(name, config);
    }

    /// Providers that can run with these credentials, in declaration order
    pub fn list_enabled(&self, credentials: &Credentials) -> Vec<Arc<dyn Provider>> {
        self.providers
            .iter()
            .filter(|p| !self.is_disabled(p.name()))
            .filter(|p| {
                let enabled = p.is_enabled(credentials);
                if !enabled {
                    self.warn_missing(p.as_ref());
                }
                enabled
            })
            .cloned()
            .collect()
    }

    fn is_disabled(&self, name: &str) -> bool {
        self.configs.get(name).map(|c| c.disabled).unwrap_or(false)
    }

    fn warn_missing(&self, provider: &dyn Provider) {
        let mut warned = match self.warned.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if warned.insert(provider.name().to_string()) {
            warn!(
                "Provider {} disabled: missing {}",
                provider.name(),
                provider.required_credentials().join(" + ")
            );
        }
    }

    /// Get a provider by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.iter().find(|p| p.name() == name)
    }

    /// All provider names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Check if a provider exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Effective timeout for a provider
    pub fn timeout_for(&self, name: &str, default: Duration) -> Duration {
        self.configs
            .get(name)
            .and_then(|c| c.timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or(default)
    }

    /// Effective rescoring weight for a provider
    pub fn weight_for(&self, name: &str) -> f64 {
        self.configs
            .get(name)
            .and_then(|c| c.weight)
            .or_else(|| self.get(name).map(|p| p.weight()))
            .unwrap_or(NEUTRAL_WEIGHT)
    }

    /// Weights for every registered provider, for building a rescorer
    pub fn weights(&self) -> HashMap<String, f64> {
        self.providers
            .iter()
            .map(|p| (p.name().to_string(), self.weight_for(p.name())))
            .collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_credentials() -> Credentials {
        Credentials::new()
            .with("BING_API_KEY", "a")
            .with("SERPAPI_KEY", "b")
            .with("GOOGLE_PSE_KEY", "c")
            .with("GOOGLE_PSE_CX", "d")
            .with("BRAVE_API_KEY", "e")
            .with("GROQ_API_KEY", "f")
    }

    fn names(list: &[Arc<dyn Provider>]) -> Vec<String> {
        list.iter().map(|p| p.name().to_string()).collect()
    }

    #[test]
    fn test_declaration_order() {
        let registry = ProviderRegistry::with_defaults(&Settings::default());
        assert_eq!(
            registry.names(),
            vec!["bing", "serpapi", "google_pse", "brave", "groq"]
        );
        assert_eq!(
            names(&registry.list_enabled(&all_credentials())),
            vec!["bing", "serpapi", "google_pse", "brave", "groq"]
        );
    }

    #[test]
    fn test_only_credentialed_providers_are_enabled() {
        let registry = ProviderRegistry::with_defaults(&Settings::default());
        let creds = Credentials::new().with("SERPAPI_KEY", "x");
        assert_eq!(names(&registry.list_enabled(&creds)), vec!["serpapi"]);
        assert!(registry.list_enabled(&Credentials::new()).is_empty());
    }

    #[test]
    fn test_enablement_follows_each_snapshot() {
        let registry = ProviderRegistry::with_defaults(&Settings::default());
        let before = Credentials::new();
        let after = Credentials::new().with("BRAVE_API_KEY", "x");
        assert!(registry.list_enabled(&before).is_empty());
        assert_eq!(names(&registry.list_enabled(&after)), vec!["brave"]);
        assert!(registry.list_enabled(&before).is_empty());
    }

    #[test]
    fn test_disabled_in_settings() {
        let settings = Settings {
            providers: vec![ProviderConfig {
                name: "bing".to_string(),
                disabled: true,
                ..Default::default()
            }],
            ..Default::default()
        };
        let registry = ProviderRegistry::with_defaults(&settings);
        let enabled = names(&registry.list_enabled(&all_credentials()));
        assert!(!enabled.contains(&"bing".to_string()));
        assert_eq!(enabled.len(), 4);
    }

    #[test]
    fn test_weight_and_timeout_overrides() {
        let settings = Settings {
            providers: vec![ProviderConfig {
                name: "brave".to_string(),
                weight: Some(1.5),
                timeout_ms: Some(900),
                ..Default::default()
            }],
            ..Default::default()
        };
        let registry = ProviderRegistry::with_defaults(&settings);
        assert_eq!(registry.weight_for("brave"), 1.5);
        assert_eq!(registry.weight_for("bing"), 1.2);
        assert_eq!(registry.weight_for("unknown"), 1.0);
        assert_eq!(
            registry.timeout_for("brave", Duration::from_millis(2500)),
            Duration::from_millis(900)
        );
        assert_eq!(
            registry.timeout_for("groq", Duration::from_millis(2500)),
            Duration::from_millis(2500)
        );
    }

    #[test]
    fn test_weights_come_from_providers() {
        let registry = ProviderRegistry::with_defaults(&Settings::default());
        let weights = registry.weights();

        assert_eq!(weights.len(), 5);
        assert_eq!(weights["bing"], 1.2);
        assert_eq!(weights["serpapi"], 1.1);
        assert_eq!(weights["google_pse"], 1.0);
        assert_eq!(weights["brave"], 1.0);
        assert_eq!(weights["groq"], 0.9);

        let rescorer = crate::results::Rescorer::with_weights(weights);
        assert_eq!(rescorer.weight("groq"), 0.9);
    }
}
