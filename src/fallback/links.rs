//! Result-link extraction from a search-results page

use super::LinkExtractor;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

static RESULT_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a.result__a").unwrap());
static ANY_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Links from a DuckDuckGo-style HTML results page
///
/// Prefers the `a.result__a` result anchors. When the page has none, any
/// absolute `http(s)` anchor is taken instead.
#[derive(Debug, Clone, Default)]
pub struct DuckDuckGoLinks;

impl DuckDuckGoLinks {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for DuckDuckGoLinks {
    fn extract_links(&self, html: &str, base: &Url, max: usize) -> Vec<String> {
        let document = Html::parse_document(html);

        let mut links = collect(
            document
                .select(&RESULT_LINK)
                .filter_map(|a| a.value().attr("href"))
                .filter_map(|href| resolve(base, href)),
            max,
        );

        if links.is_empty() {
            links = collect(
                document
                    .select(&ANY_LINK)
                    .filter_map(|a| a.value().attr("href"))
                    .filter(|href| href.starts_with("http"))
                    .filter_map(|href| resolve(base, href)),
                max,
            );
        }

        links
    }
}

fn collect(urls: impl Iterator<Item = String>, max: usize) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for url in urls {
        if links.len() >= max {
            break;
        }
        if !links.contains(&url) {
            links.push(url);
        }
    }
    links
}

/// Resolve `href` against the page and unwrap `/l/?uddg=` redirects
fn resolve(base: &Url, href: &str) -> Option<String> {
    let url = base.join(href.trim()).ok()?;

    let target = if url.path().starts_with("/l/") {
        url.query_pairs()
            .find(|(k, _)| k == "uddg")
            .and_then(|(_, v)| Url::parse(&v).ok())
            .unwrap_or(url)
    } else {
        url
    };

    match target.scheme() {
        "http" | "https" => Some(target.to_string()),
        _ => None,
    }
}
