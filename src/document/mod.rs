//! Loaded document and the text analysis used on it
//!
//! At most one document is active at a time. It is replaced wholesale or
//! cleared, never edited in place.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chunk size used for document prompts
pub const CHUNK_SIZE: usize = 1400;

static HIGHLIGHTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(highlights?|key ?points?|action items?|takeaways?|bullet(s| points?)?)\b").unwrap()
});
static SUMMARIZE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(summar(y|ies|ize|ise|izing|ising)|tl;?dr|overview|gist|recap)\b").unwrap()
});

/// The active document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentContext {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
}

impl DocumentContext {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// A document only counts when it has text
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// What a document query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Qa,
    Summarize,
    Highlights,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Qa => "qa",
            Intent::Summarize => "summarize",
            Intent::Highlights => "highlights",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chunking, relevance selection and intent classification
pub trait DocumentAnalyzer: Send + Sync {
    /// Ordered chunks of at most `size` characters
    fn chunk(&self, text: &str, size: usize) -> Vec<String>;

    /// The `k` chunks most relevant to `query`, best first
    fn select_relevant(&self, query: &str, text: &str, k: usize) -> Vec<String>;

    fn classify_intent(&self, query: &str) -> Intent;
}

/// Keyword-overlap analyzer
#[derive(Debug, Clone, Default)]
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentAnalyzer for HeuristicAnalyzer {
    fn chunk(&self, text: &str, size: usize) -> Vec<String> {
        let size = size.max(1);
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let mut end = (start + size).min(chars.len());
            // Break on whitespace when one exists in the back half of the window
            if end < chars.len() {
                if let Some(pos) = (start + size / 2..end).rev().find(|&i| chars[i].is_whitespace()) {
                    end = pos;
                }
            }

            let chunk: String = chars[start..end].iter().collect();
            let chunk = chunk.trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }
            start = end.max(start + 1);
        }

        chunks
    }

    fn select_relevant(&self, query: &str, text: &str, k: usize) -> Vec<String> {
        let query = query.to_lowercase();
        let words: Vec<&str> = query
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 2)
            .collect();

        let mut scored: Vec<(usize, String)> = self
            .chunk(text, CHUNK_SIZE)
            .into_iter()
            .map(|chunk| {
                let lower = chunk.to_lowercase();
                let score = words.iter().map(|w| lower.matches(*w).count()).sum();
                (score, chunk)
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(k).map(|(_, chunk)| chunk).collect()
    }

    fn classify_intent(&self, query: &str) -> Intent {
        if HIGHLIGHTS.is_match(query) {
            Intent::Highlights
        } else if SUMMARIZE.is_match(query) {
            Intent::Summarize
        } else {
            Intent::Qa
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_intent() {
        let analyzer = HeuristicAnalyzer::new();
        assert_eq!(analyzer.classify_intent("summarize the document"), Intent::Summarize);
        assert_eq!(analyzer.classify_intent("Give me a TL;DR"), Intent::Summarize);
        assert_eq!(analyzer.classify_intent("what are the key points?"), Intent::Highlights);
        assert_eq!(analyzer.classify_intent("list the action items"), Intent::Highlights);
        assert_eq!(analyzer.classify_intent("who signed the contract?"), Intent::Qa);
    }

    #[test]
    fn test_chunks_respect_size_and_cover_text() {
        let analyzer = HeuristicAnalyzer::new();
        let text = "word ".repeat(1000);
        let chunks = analyzer.chunk(&text, 100);

        assert!(chunks.iter().all(|c| c.chars().count() <= 100));
        let words: usize = chunks.iter().map(|c| c.split_whitespace().count()).sum();
        assert_eq!(words, 1000);
    }

    #[test]
    fn test_chunk_without_whitespace() {
        let analyzer = HeuristicAnalyzer::new();
        let chunks = analyzer.chunk(&"x".repeat(250), 100);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 50);
    }

    #[test]
    fn test_select_relevant_ranks_by_overlap() {
        let analyzer = HeuristicAnalyzer::new();
        let filler = "lorem ipsum dolor sit amet ".repeat(60);
        let text = format!("{} The invoice total is due on Friday. {}", filler, filler);

        let best = analyzer.select_relevant("when is the invoice due", &text, 1);
        assert_eq!(best.len(), 1);
        assert!(best[0].contains("invoice"));
    }

    #[test]
    fn test_select_relevant_without_matches_keeps_order() {
        let analyzer = HeuristicAnalyzer::new();
        let text = "a ".repeat(2000);
        let all = analyzer.chunk(&text, CHUNK_SIZE);
        let picked = analyzer.select_relevant("zebra", &text, 2);
        assert_eq!(picked, all.into_iter().take(2).collect::<Vec<_>>());
    }

    #[test]
    fn test_document_has_text() {
        assert!(!DocumentContext::default().has_text());
        assert!(!DocumentContext::new("a.pdf", "   ").has_text());
        assert!(DocumentContext::new("a.pdf", "content").has_text());
    }
}
