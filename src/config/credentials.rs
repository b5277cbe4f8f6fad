//! Provider and backend credentials
//!
//! A `Credentials` value is a snapshot taken when a request starts. Adding or
//! removing a key in the environment takes effect on the next snapshot.

use std::collections::HashMap;

/// Environment variables consulted for credentials
pub const KNOWN_KEYS: &[&str] = &[
    "BING_API_KEY",
    "SERPAPI_KEY",
    "GOOGLE_PSE_KEY",
    "GOOGLE_PSE_CX",
    "BRAVE_API_KEY",
    "GROQ_API_KEY",
    "OPENAI_API_KEY",
];

/// Credential key for the cloud generation backend
pub const CLOUD_KEY: &str = "OPENAI_API_KEY";

/// Immutable set of credential values
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    values: HashMap<String, String>,
}

impl Credentials {
    /// Empty credential set
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the environment on top of statically configured values
    pub fn from_env_over(configured: &HashMap<String, String>) -> Self {
        let mut creds = Self::new();
        for (key, value) in configured {
            creds = creds.with(key.clone(), value.clone());
        }
        for key in KNOWN_KEYS {
            if let Ok(value) = std::env::var(key) {
                creds = creds.with(*key, value);
            }
        }
        creds
    }

    /// Add a credential, ignoring blank values
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into().trim().to_string();
        if !value.is_empty() {
            self.values.insert(key.into(), value);
        }
        self
    }

    /// Get a credential value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check whether a non-blank credential is present
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Check whether every listed credential is present
    pub fn has_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|k| self.has(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_absent() {
        let creds = Credentials::new().with("SERPAPI_KEY", "   ");
        assert!(!creds.has("SERPAPI_KEY"));
    }

    #[test]
    fn test_has_all() {
        let creds = Credentials::new()
            .with("GOOGLE_PSE_KEY", "k")
            .with("GOOGLE_PSE_CX", "cx");
        assert!(creds.has_all(&["GOOGLE_PSE_KEY", "GOOGLE_PSE_CX"]));
        assert!(!creds.has_all(&["GOOGLE_PSE_KEY", "BING_API_KEY"]));
        assert!(creds.has_all(&[]));
    }

    #[test]
    fn test_configured_values_are_kept() {
        let mut configured = HashMap::new();
        configured.insert("HALO_TEST_ONLY_KEY".to_string(), "x".to_string());
        let creds = Credentials::from_env_over(&configured);
        assert_eq!(creds.get("HALO_TEST_ONLY_KEY"), Some("x"));
    }
}
