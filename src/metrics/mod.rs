//! Provider usage statistics
//!
//! Process-wide counters shared through an `Arc`. Counters only ever grow and
//! are reset by restarting the process.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Recent latencies kept per provider
const LATENCY_WINDOW: usize = 100;

#[derive(Debug, Default)]
struct Counters {
    used: u64,
    empty: u64,
    errors: u64,
    latencies: VecDeque<u64>,
    last_used: Option<DateTime<Utc>>,
}

/// Usage counters per provider
#[derive(Debug, Default)]
pub struct ProviderStats {
    /// Total race/sequential searches run
    total_searches: AtomicU64,
    providers: RwLock<HashMap<String, Counters>>,
}

impl ProviderStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a call that produced results
    pub fn record_use(&self, provider: &str, latency_ms: u64) {
        self.with_counters(provider, |c| {
            c.used += 1;
            if c.latencies.len() >= LATENCY_WINDOW {
                c.latencies.pop_front();
            }
            c.latencies.push_back(latency_ms);
            c.last_used = Some(Utc::now());
        });
    }

    /// Record a call that completed without results
    pub fn record_empty(&self, provider: &str) {
        self.with_counters(provider, |c| c.empty += 1);
    }

    /// Record a failed or timed-out call
    pub fn record_error(&self, provider: &str) {
        self.with_counters(provider, |c| c.errors += 1);
    }

    fn with_counters(&self, provider: &str, f: impl FnOnce(&mut Counters)) {
        let mut providers = match self.providers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(providers.entry(provider.to_string()).or_default());
    }

    /// Get total searches
    pub fn total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Number of calls from `provider` that produced results
    pub fn used(&self, provider: &str) -> u64 {
        self.snapshot().get(provider).map(|s| s.used).unwrap_or(0)
    }

    /// Copy of all counters, ordered by provider name
    pub fn snapshot(&self) -> BTreeMap<String, ProviderUsage> {
        let providers = match self.providers.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        providers
            .iter()
            .map(|(name, c)| {
                let avg_latency_ms = if c.latencies.is_empty() {
                    None
                } else {
                    Some(c.latencies.iter().sum::<u64>() / c.latencies.len() as u64)
                };
                (
                    name.clone(),
                    ProviderUsage {
                        used: c.used,
                        empty: c.empty,
                        errors: c.errors,
                        avg_latency_ms,
                        last_used: c.last_used,
                    },
                )
            })
            .collect()
    }
}

/// Statistics for a single provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderUsage {
    pub used: u64,
    pub empty: u64,
    pub errors: u64,
    pub avg_latency_ms: Option<u64>,
    pub last_used: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = ProviderStats::new();

        stats.inc_search();
        stats.record_use("serpapi", 100);
        stats.record_use("serpapi", 300);
        stats.record_empty("brave");
        stats.record_error("brave");

        assert_eq!(stats.total_searches(), 1);
        assert_eq!(stats.used("serpapi"), 2);
        assert_eq!(stats.used("brave"), 0);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot["serpapi"].avg_latency_ms, Some(200));
        assert!(snapshot["serpapi"].last_used.is_some());
        assert_eq!(snapshot["brave"].empty, 1);
        assert_eq!(snapshot["brave"].errors, 1);
    }

    #[test]
    fn test_latency_window_is_bounded() {
        let stats = ProviderStats::new();
        for i in 0..150 {
            stats.record_use("bing", i);
        }
        let snapshot = stats.snapshot();
        assert_eq!(snapshot["bing"].used, 150);
        // average over the last 100 samples (50..150)
        assert_eq!(snapshot["bing"].avg_latency_ms, Some(99));
    }
}
