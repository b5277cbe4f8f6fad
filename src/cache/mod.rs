//! In-memory cache of extracted page text
//!
//! Keyed by page URL. Queries are never stored.

use moka::future::Cache;
use std::time::Duration;

/// Cache for readable text extracted from fetched pages
#[derive(Clone)]
pub struct PageCache {
    cache: Cache<String, String>,
}

impl PageCache {
    /// Create a new page cache with specified TTL
    pub fn new(ttl_seconds: u64, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        Self { cache }
    }

    /// Get cached text for a URL
    pub async fn get(&self, url: &str) -> Option<String> {
        self.cache.get(url).await
    }

    /// Store extracted text for a URL
    pub async fn set(&self, url: String, text: String) {
        self.cache.insert(url, text).await;
    }

    /// Clear the entire cache
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(300, 512)
    }
}
