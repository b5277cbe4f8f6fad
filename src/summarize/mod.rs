//! Extractive summarization
//!
//! Picks existing sentences by how many query words they contain. Used on
//! scraped pages, web snippets and document text alike.

/// Sentences shorter than this are only used when nothing longer exists
const MIN_SENTENCE_CHARS: usize = 30;

/// Split text after `.`, `!` or `?` when followed by whitespace
///
/// Punctuation stays with its sentence. Pieces are trimmed and empty pieces
/// dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() && matches!(prev, Some('.') | Some('!') | Some('?')) {
            sentences.push(&text[start..i]);
            start = i;
        }
        prev = Some(c);
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Up to `k` of the sentences most relevant to `query`, joined by spaces
///
/// Ties keep their original order. Sentences of 30 characters or less are
/// passed over; if that leaves nothing, the first `k` sentences are used.
pub fn extractive_summary(text: &str, query: &str, k: usize) -> String {
    if text.trim().is_empty() || k == 0 {
        return String::new();
    }

    let query = query.to_lowercase();
    let words: Vec<&str> = query.split_whitespace().collect();
    let sentences = split_sentences(text);

    let mut scored: Vec<(usize, &str)> = sentences
        .iter()
        .map(|s| {
            let lower = s.to_lowercase();
            let score = words.iter().filter(|w| lower.contains(*w)).count();
            (score, *s)
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let chosen: Vec<&str> = scored
        .into_iter()
        .filter(|(_, s)| s.chars().count() > MIN_SENTENCE_CHARS)
        .take(k)
        .map(|(_, s)| s)
        .collect();

    if chosen.is_empty() {
        sentences.into_iter().take(k).collect::<Vec<_>>().join(" ")
    } else {
        chosen.join(" ")
    }
}

/// Render up to `max` sentences of `text` as `• ` bullets, one per line
pub fn bullet_points(text: &str, max: usize) -> String {
    split_sentences(text)
        .into_iter()
        .take(max)
        .map(|s| format!("• {}", s))
        .collect::<Vec<_>>()
        .join("\n")
}
