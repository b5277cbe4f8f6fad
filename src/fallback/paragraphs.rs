//! Readable paragraph extraction from arbitrary pages

use super::ParagraphExtractor;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static BLOCK: Lazy<Selector> = Lazy::new(|| Selector::parse("div, section, article").unwrap());
static BOILERPLATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)cookie|subscribe|advert").unwrap());

const MIN_PARAGRAPH_CHARS: usize = 50;
const MIN_BLOCK_CHARS: usize = 80;
const MIN_BLOCK_WORDS: usize = 10;
const MIN_KEPT_CHARS: usize = 40;
const MAX_PARAGRAPHS: usize = 10;

/// Paragraph heuristics: `<p>` text first, block elements when there is none
#[derive(Debug, Clone, Default)]
pub struct HeuristicParagraphs;

impl HeuristicParagraphs {
    pub fn new() -> Self {
        Self
    }
}

impl ParagraphExtractor for HeuristicParagraphs {
    fn extract(&self, html: &str) -> String {
        let document = Html::parse_document(html);

        let mut candidates: Vec<String> = document
            .select(&PARAGRAPH)
            .map(collapsed_text)
            .filter(|t| t.chars().count() > MIN_PARAGRAPH_CHARS && !BOILERPLATE.is_match(t))
            .collect();

        if candidates.is_empty() {
            candidates = document
                .select(&BLOCK)
                .map(collapsed_text)
                .filter(|t| {
                    t.chars().count() > MIN_BLOCK_CHARS && t.split(' ').count() > MIN_BLOCK_WORDS
                })
                .collect();
        }

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .filter(|t| t.chars().count() >= MIN_KEPT_CHARS)
            .take(MAX_PARAGRAPHS)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
