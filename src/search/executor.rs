//! Provider race and sequential execution

use super::models::{SearchQuery, Strategy};
use crate::config::Credentials;
use crate::metrics::ProviderStats;
use crate::network::HttpClient;
use crate::providers::{Provider, ProviderRegistry, RequestParams};
use crate::results::{normalize, Rescorer, SearchResult, DEFAULT_TOP_N};
use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Runs web searches across the enabled providers under a strategy
pub struct RaceEngine {
    /// HTTP client for making requests
    client: HttpClient,
    /// Provider registry
    registry: Arc<ProviderRegistry>,
    /// Shared usage counters
    stats: Arc<ProviderStats>,
    /// Snippet rescorer
    rescorer: Rescorer,
    /// Default per-provider timeout
    default_timeout: Duration,
    /// Maximum per-provider timeout
    max_timeout: Duration,
    /// Results kept after rescoring
    top_n: usize,
}

impl RaceEngine {
    /// Create a new engine; rescoring weights come from the registry
    pub fn new(client: HttpClient, registry: Arc<ProviderRegistry>, stats: Arc<ProviderStats>) -> Self {
        let rescorer = Rescorer::with_weights(registry.weights());
        Self {
            client,
            registry,
            stats,
            rescorer,
            default_timeout: Duration::from_millis(2500),
            max_timeout: Duration::from_secs(30),
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Set default timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set how many results survive rescoring
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn stats(&self) -> &Arc<ProviderStats> {
        &self.stats
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Strategy search, rescored and cut to the top results
    pub async fn search(&self, query: &SearchQuery, credentials: &Credentials) -> Vec<SearchResult> {
        let results = self.run(query, credentials).await;
        self.rescorer.rescore(results, &query.query, self.top_n)
    }

    /// Strategy search returning the winning provider's normalized list
    pub async fn run(&self, query: &SearchQuery, credentials: &Credentials) -> Vec<SearchResult> {
        if query.is_empty() {
            return Vec::new();
        }

        let enabled = self.registry.list_enabled(credentials);
        if enabled.is_empty() {
            debug!("No providers enabled for '{}'", query.query);
            return Vec::new();
        }

        self.stats.inc_search();

        match query.strategy {
            Strategy::Fastest => self.fastest(enabled, query, credentials).await,
            strategy => self.sequential(strategy, enabled, query, credentials).await,
        }
    }

    /// Invoke every enabled provider, wait for all, flatten in declaration order
    pub async fn search_all(&self, query: &SearchQuery, credentials: &Credentials) -> Vec<SearchResult> {
        if query.is_empty() {
            return Vec::new();
        }

        let enabled = self.registry.list_enabled(credentials);
        if enabled.is_empty() {
            debug!("No providers enabled for '{}'", query.query);
            return Vec::new();
        }

        self.stats.inc_search();

        info!(
            "Executing search '{}' on {} providers",
            query.query,
            enabled.len()
        );

        let futures: Vec<_> = enabled
            .iter()
            .map(|provider| self.call_provider(provider.clone(), query, credentials))
            .collect();

        let mut results: Vec<SearchResult> = join_all(futures).await.into_iter().flatten().collect();
        results.truncate(query.max_results * 4);
        results
    }

    /// First non-empty completion wins; the remaining calls are dropped
    async fn fastest(
        &self,
        enabled: Vec<Arc<dyn Provider>>,
        query: &SearchQuery,
        credentials: &Credentials,
    ) -> Vec<SearchResult> {
        let mut pending: FuturesUnordered<_> = enabled
            .into_iter()
            .map(|provider| self.call_provider(provider, query, credentials))
            .collect();

        while let Some(results) = pending.next().await {
            if let Some(first) = results.first() {
                info!(
                    "strategy={} provider={} latency={}ms",
                    Strategy::Fastest,
                    first.provider,
                    first.latency_ms
                );
                // Dropping `pending` cancels the losers still in flight
                return results;
            }
        }

        Vec::new()
    }

    /// One provider at a time in the strategy's order
    async fn sequential(
        &self,
        strategy: Strategy,
        enabled: Vec<Arc<dyn Provider>>,
        query: &SearchQuery,
        credentials: &Credentials,
    ) -> Vec<SearchResult> {
        let ordered = strategy
            .order()
            .iter()
            .filter_map(|name| enabled.iter().find(|p| p.name() == *name))
            .chain(
                enabled
                    .iter()
                    .filter(|p| !strategy.order().iter().any(|name| *name == p.name())),
            );

        for provider in ordered {
            let results = self.call_provider(provider.clone(), query, credentials).await;
            if let Some(first) = results.first() {
                info!(
                    "strategy={} provider={} latency={}ms",
                    strategy, first.provider, first.latency_ms
                );
                return results;
            }
        }

        Vec::new()
    }

    /// Call one provider under its timeout; failures come back empty
    async fn call_provider(
        &self,
        provider: Arc<dyn Provider>,
        query: &SearchQuery,
        credentials: &Credentials,
    ) -> Vec<SearchResult> {
        let name = provider.name().to_string();
        let provider_timeout = query
            .timeout
            .unwrap_or_else(|| self.registry.timeout_for(&name, self.default_timeout))
            .min(self.max_timeout);

        let params = RequestParams::new(query.query.clone())
            .with_max_results(query.max_results)
            .with_timeout(provider_timeout);

        debug!("Searching provider {} with timeout {:?}", name, provider_timeout);

        let start = Instant::now();
        let result = timeout(provider_timeout, provider.search(&self.client, &params, credentials)).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(raw)) => {
                let results = normalize(raw, &name, latency_ms);
                if results.is_empty() {
                    debug!("Provider {} returned no usable results", name);
                    self.stats.record_empty(&name);
                } else {
                    debug!(
                        "Provider {} returned {} results in {}ms",
                        name,
                        results.len(),
                        latency_ms
                    );
                    self.stats.record_use(&name, latency_ms);
                }
                results
            }
            Ok(Err(e)) => {
                warn!("Provider {} failed: {}", name, e);
                self.stats.record_error(&name);
                Vec::new()
            }
            Err(_) => {
                warn!("Provider {} timed out after {:?}", name, provider_timeout);
                self.stats.record_error(&name);
                Vec::new()
            }
        }
    }
}
