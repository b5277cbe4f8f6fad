//! Query signal detection
//!
//! Recognises the cues the answer orchestrator routes on:
//! - References to the loaded document: `document`, `doc`, `file`, `pdf`, `attached`, `code review`
//! - Explicit web prefix: `web: ...`
//! - Recency: `latest`, `price`, years 2024-2029

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DOCUMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(documents?|docs?|files?|pdfs?|attached|attachments?|code reviews?)\b").unwrap()
});
static WEB_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*web:").unwrap());
static RECENCY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(latest|prices?|202[4-9])\b").unwrap());

/// Routing cues found in a user query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySignals {
    /// The trimmed query
    pub query: String,
    /// Query refers to a document
    pub mentions_document: bool,
    /// Query starts with `web:`
    pub web_prefix: bool,
    /// Query asks for recent information
    pub wants_recent: bool,
}

impl QuerySignals {
    /// Detect signals in a raw query
    pub fn parse(raw: &str) -> Self {
        let query = raw.trim().to_string();
        Self {
            mentions_document: DOCUMENT_RE.is_match(&query),
            web_prefix: WEB_PREFIX_RE.is_match(&query),
            wants_recent: RECENCY_RE.is_match(&query),
            query,
        }
    }

    /// Check if query is empty
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// Web results are wanted by the query itself
    pub fn wants_web(&self) -> bool {
        self.web_prefix || self.wants_recent
    }

    /// Text sent to web search, without any `web:` prefix
    pub fn search_text(&self) -> &str {
        match WEB_PREFIX_RE.find(&self.query) {
            Some(m) => self.query[m.end()..].trim(),
            None => &self.query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_query() {
        let signals = QuerySignals::parse("  what is tokio  ");
        assert_eq!(signals.query, "what is tokio");
        assert!(!signals.mentions_document);
        assert!(!signals.wants_web());
        assert_eq!(signals.search_text(), "what is tokio");
    }

    #[test]
    fn test_document_mentions() {
        for q in [
            "summarize the document",
            "What does the PDF say?",
            "check the attached",
            "do a code review",
            "compare these files",
            "read the docs",
        ] {
            assert!(QuerySignals::parse(q).mentions_document, "{}", q);
        }
        assert!(!QuerySignals::parse("docker compose tips").mentions_document);
        assert!(!QuerySignals::parse("profile settings").mentions_document);
    }

    #[test]
    fn test_web_prefix() {
        let signals = QuerySignals::parse("WEB: rust 1.80 release notes");
        assert!(signals.web_prefix);
        assert!(signals.wants_web());
        assert_eq!(signals.search_text(), "rust 1.80 release notes");
    }

    #[test]
    fn test_recency() {
        assert!(QuerySignals::parse("latest tokio version").wants_recent);
        assert!(QuerySignals::parse("bitcoin prices").wants_recent);
        assert!(QuerySignals::parse("events in 2025").wants_recent);
        assert!(!QuerySignals::parse("events in 2023").wants_recent);
        assert!(!QuerySignals::parse("the 20245 code").wants_recent);
    }
}
