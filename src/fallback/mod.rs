//! Web retrieval fallback
//!
//! Used when no provider is enabled or every provider came back empty: fetch
//! a public search-results page, follow its top links and pull readable
//! paragraphs out of each page. Every step is best effort.

mod links;
mod paragraphs;

pub use links::DuckDuckGoLinks;
pub use paragraphs::HeuristicParagraphs;

use crate::cache::PageCache;
use crate::config::SearchSettings;
use crate::network::{HttpClient, GENERIC_BROWSER_UA};
use futures::future::join_all;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Picks result links out of a search-results page
pub trait LinkExtractor: Send + Sync {
    /// At most `max` absolute URLs, relative links resolved against `base`
    fn extract_links(&self, html: &str, base: &Url, max: usize) -> Vec<String>;
}

/// Turns an HTML page into readable text
pub trait ParagraphExtractor: Send + Sync {
    /// Paragraphs joined by blank lines; empty when nothing readable was found
    fn extract(&self, html: &str) -> String;
}

/// Readable text pulled from one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageText {
    pub url: String,
    pub text: String,
}

/// Scrape-based retrieval
pub struct WebRetrievalFallback {
    client: HttpClient,
    links: Box<dyn LinkExtractor>,
    paragraphs: Box<dyn ParagraphExtractor>,
    /// Results page template, `{query}` is replaced by the encoded query
    search_url: String,
    page_timeout: Duration,
    cache: PageCache,
}

impl WebRetrievalFallback {
    pub fn new(client: HttpClient, settings: &SearchSettings) -> Self {
        Self {
            client,
            links: Box::new(DuckDuckGoLinks::new()),
            paragraphs: Box::new(HeuristicParagraphs::new()),
            search_url: settings.fallback_url.clone(),
            page_timeout: Duration::from_millis(settings.page_timeout_ms),
            cache: PageCache::new(settings.page_cache_ttl, 512),
        }
    }

    pub fn with_link_extractor(mut self, links: impl LinkExtractor + 'static) -> Self {
        self.links = Box::new(links);
        self
    }

    pub fn with_paragraph_extractor(mut self, paragraphs: impl ParagraphExtractor + 'static) -> Self {
        self.paragraphs = Box::new(paragraphs);
        self
    }

    /// Top result links for a query; empty on any failure
    pub async fn search_links(&self, query: &str, max: usize) -> Vec<String> {
        let url = self
            .search_url
            .replace("{query}", &urlencoding::encode(query.trim()));

        let response = match self.client.get_page(&url, GENERIC_BROWSER_UA, self.page_timeout).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                warn!("Results page returned HTTP {}", response.status);
                return Vec::new();
            }
            Err(e) => {
                warn!("Results page fetch failed: {}", e);
                return Vec::new();
            }
        };

        let base = match Url::parse(&response.url).or_else(|_| Url::parse(&url)) {
            Ok(base) => base,
            Err(e) => {
                warn!("Invalid results page URL {}: {}", url, e);
                return Vec::new();
            }
        };

        let links = self.links.extract_links(&response.text, &base, max);
        debug!("Fallback found {} links for '{}'", links.len(), query);
        links
    }

    /// Readable text of one page; `None` when skipped or nothing was extracted
    pub async fn fetch_and_extract(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }

        if let Some(text) = self.cache.get(url).await {
            debug!("Page cache hit for {}", url);
            return Some(text);
        }

        let response = match self.client.get_page(url, GENERIC_BROWSER_UA, self.page_timeout).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                debug!("Skipping {}: HTTP {}", url, response.status);
                return None;
            }
            Err(e) => {
                debug!("Skipping {}: {}", url, e);
                return None;
            }
        };

        let text = self.paragraphs.extract(&response.text);
        if text.is_empty() {
            return None;
        }

        self.cache.set(url.to_string(), text.clone()).await;
        Some(text)
    }

    /// Search, then fetch every link; failed pages are left out
    pub async fn gather(&self, query: &str, max: usize) -> Vec<PageText> {
        let links = self.search_links(query, max).await;

        let pages = join_all(links.iter().map(|url| async move {
            self.fetch_and_extract(url).await.map(|text| PageText {
                url: url.clone(),
                text,
            })
        }))
        .await;

        pages.into_iter().flatten().collect()
    }

    /// All gathered page text as one block
    pub async fn web_context(&self, query: &str, max: usize) -> String {
        self.gather(query, max)
            .await
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ARTICLE: &str = "<p>Tokio is an asynchronous runtime for the Rust programming language.</p>";

    fn fallback(server: &MockServer) -> WebRetrievalFallback {
        let settings = SearchSettings {
            fallback_url: format!("{}/html/?q={{query}}", server.uri()),
            page_timeout_ms: 1000,
            ..Default::default()
        };
        WebRetrievalFallback::new(HttpClient::new().unwrap(), &settings)
    }

    #[tokio::test]
    async fn test_gather_skips_failing_pages() {
        let server = MockServer::start().await;
        let results_page = format!(
            r#"<a class="result__a" href="{0}/good">good</a>
               <a class="result__a" href="{0}/broken">broken</a>
               <a class="result__a" href="{0}/empty">empty</a>"#,
            server.uri()
        );

        Mock::given(method("GET"))
            .and(path("/html/"))
            .and(query_param("q", "what is tokio"))
            .respond_with(ResponseTemplate::new(200).set_body_string(results_page))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/good"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>tiny</p>"))
            .mount(&server)
            .await;

        let pages = fallback(&server).gather("what is tokio", 5).await;
        assert_eq!(pages.len(), 1);
        assert!(pages[0].url.ends_with("/good"));
        assert!(pages[0].text.starts_with("Tokio is"));
    }

    #[tokio::test]
    async fn test_results_page_failure_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(fallback(&server).web_context("anything", 3).await.is_empty());
    }

    #[tokio::test]
    async fn test_pages_are_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
            .expect(1)
            .mount(&server)
            .await;

        let fallback = fallback(&server);
        let url = format!("{}/page", server.uri());
        assert!(fallback.fetch_and_extract(&url).await.is_some());
        assert!(fallback.fetch_and_extract(&url).await.is_some());
    }

    struct FixedLinks(Vec<String>);

    impl LinkExtractor for FixedLinks {
        fn extract_links(&self, _html: &str, _base: &Url, max: usize) -> Vec<String> {
            self.0.iter().take(max).cloned().collect()
        }
    }

    struct WholeBody;

    impl ParagraphExtractor for WholeBody {
        fn extract(&self, html: &str) -> String {
            html.trim().to_string()
        }
    }

    #[tokio::test]
    async fn test_custom_extractors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("no anchors here"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/plain"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  short body  "))
            .mount(&server)
            .await;

        let fallback = fallback(&server)
            .with_link_extractor(FixedLinks(vec![format!("{}/plain", server.uri())]))
            .with_paragraph_extractor(WholeBody);

        let pages = fallback.gather("anything", 3).await;
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text, "short body");
    }

    #[tokio::test]
    async fn test_relative_urls_are_skipped() {
        let server = MockServer::start().await;
        assert!(fallback(&server).fetch_and_extract("/relative/path").await.is_none());
    }
}
