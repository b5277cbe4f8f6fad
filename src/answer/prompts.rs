//! Prompt text and fixed answer strings

use crate::document::Intent;
use crate::llm::{ChatMessage, GenerationRequest};

pub const FROM_DOCUMENT: &str = "From your document:";
pub const FROM_WEB: &str = "From the web:";
pub const KEY_POINTS: &str = "Here are the key points:";

pub const NO_SUMMARY: &str = "I read the document but could not extract a clean summary.";
pub const NO_HIGHLIGHTS: &str = "No clear highlights found.";
pub const NO_DOC_ANSWER: &str = "I checked the document but didn’t find a clear answer.";

/// Apology naming the query when nothing was found
pub fn no_public_info(query: &str) -> String {
    format!("I couldn’t find enough public info for “{}”.", query)
}

/// Apology for a document-plus-web request that found nothing
pub fn no_hybrid_info(query: &str) -> String {
    format!(
        "I couldn't find enough in the document or the web for “{}”. Try rephrasing.",
        query
    )
}

/// Bulleted web section
pub fn web_bullets(items: &[String]) -> String {
    format!("{}\n• {}", FROM_WEB, items.join("\n• "))
}

/// Task line for the local backend
pub fn local_task(intent: Intent, query: &str) -> String {
    match intent {
        Intent::Summarize => "Provide a concise summary.".to_string(),
        Intent::Highlights => "List key points / action items as bullets.".to_string(),
        Intent::Qa => format!("Answer the question strictly from the document: {}", query),
    }
}

/// Task line for the cloud backend
pub fn cloud_task(intent: Intent, query: &str) -> String {
    match intent {
        Intent::Summarize => "Provide a concise summary.".to_string(),
        Intent::Highlights => "List the key points / action items as bullets.".to_string(),
        Intent::Qa => format!("Answer the question strictly from the document: {}", query),
    }
}

/// Document-grounded single prompt for the local backend
pub fn local_document(name: &str, context: &str, task: &str) -> GenerationRequest {
    let prompt = format!(
        "You are {}. Use ONLY the document below to respond.\n\
         If the document lacks the answer, say \"I couldn't find this in the document.\"\n\n\
         Document:\n\"\"\"\n{}\n\"\"\"\n\nTask: {}",
        name, context, task
    );
    local(prompt)
}

/// Raw query for the local backend
pub fn local(prompt: impl Into<String>) -> GenerationRequest {
    GenerationRequest::prompt(prompt)
        .with_temperature(0.5)
        .with_max_tokens(256)
}

pub fn cloud_document(name: &str, context: &str, task: &str) -> GenerationRequest {
    let system = format!(
        "You are {}. Answer ONLY using the provided document. If the document does not contain the answer, \
         say \"I couldn't find this in the document.\" Prefer concise bullets.",
        name
    );
    let user = format!("Document: \"\"\"\n{}\n\"\"\"\n\nTask: {}", context, task);

    GenerationRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)])
        .with_temperature(0.3)
        .with_max_tokens(600)
}

pub fn cloud_hybrid(name: &str, question: &str, document: &str, web: &str) -> GenerationRequest {
    let system = format!(
        "You are {}. Produce the BEST answer by combining the provided document with external knowledge snippets.\n\
         Rules:\n\
         - Be accurate and concise.\n\
         - Prefer the document when it clearly answers; otherwise enrich with the web snippets.\n\
         - If something conflicts, say so briefly.\n\
         - Use short bullets where helpful.",
        name
    );
    let web = if web.trim().is_empty() {
        "(no web snippets)"
    } else {
        web
    };
    let user = format!(
        "Question: {}\n\nDocument context:\n\"\"\"\n{}\n\"\"\"\n\nWeb snippets:\n\"\"\"\n{}\n\"\"\"\n\n\
         Write one cohesive answer. If you use web info, reflect it clearly.",
        question, document, web
    );

    GenerationRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)])
        .with_temperature(0.4)
        .with_max_tokens(700)
}

pub fn cloud_generic(name: &str, query: &str) -> GenerationRequest {
    GenerationRequest::new(vec![
        ChatMessage::system(format!("You are {}. Provide clear, direct answers.", name)),
        ChatMessage::user(query),
    ])
    .with_temperature(0.7)
    .with_max_tokens(350)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_bullets() {
        let items = vec!["first snippet".to_string(), "second snippet".to_string()];
        assert_eq!(web_bullets(&items), "From the web:\n• first snippet\n• second snippet");
    }

    #[test]
    fn test_tasks_by_intent() {
        assert_eq!(local_task(Intent::Summarize, "q"), "Provide a concise summary.");
        assert_eq!(
            local_task(Intent::Qa, "who wrote it?"),
            "Answer the question strictly from the document: who wrote it?"
        );
        assert!(cloud_task(Intent::Highlights, "q").starts_with("List the key points"));
    }

    #[test]
    fn test_hybrid_prompt_without_web() {
        let request = cloud_hybrid("HaloAI", "q", "doc text", "  ");
        assert_eq!(request.messages.len(), 2);
        assert!(request.messages[1].content.contains("(no web snippets)"));
        assert_eq!(request.max_tokens, 700);
    }

    #[test]
    fn test_local_document_prompt() {
        let request = local_document("HaloAI", "ctx", "Provide a concise summary.");
        let prompt = request.prompt_text();
        assert!(prompt.starts_with("You are HaloAI. Use ONLY the document below"));
        assert!(prompt.ends_with("Task: Provide a concise summary."));
        assert_eq!(request.max_tokens, 256);
    }
}
