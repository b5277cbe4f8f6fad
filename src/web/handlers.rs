//! HTTP request handlers

use super::state::AppState;
use crate::answer::Answer;
use crate::document::DocumentContext;
use crate::metrics::ProviderUsage;
use crate::results::SearchResult;
use crate::search::{SearchQuery, Strategy};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of an answer request
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub query: String,
}

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// Results requested from each provider
    pub max_results: Option<usize>,
}

/// Search results response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub strategy: Strategy,
    pub number_of_results: usize,
    pub results: Vec<SearchResult>,
}

/// Summary of the loaded document
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub loaded: bool,
    pub name: String,
    pub chars: usize,
}

/// Answer flags; fields left out of an update are unchanged
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Flags {
    pub use_doc: Option<bool>,
    pub web_plus: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_searches: u64,
    pub providers: BTreeMap<String, ProviderUsage>,
}

/// Orchestrated answer
pub async fn answer(State(state): State<AppState>, Json(request): Json<AnswerRequest>) -> Json<Answer> {
    let ctx = state.answer_context().await;
    Json(state.orchestrator.answer(&request.query, &ctx).await)
}

async fn run_search(state: &AppState, params: SearchParams, all: bool) -> Json<SearchResponse> {
    let ctx = state.answer_context().await;
    let raw_query = params.q.unwrap_or_default();
    let query = SearchQuery::new(raw_query.trim())
        .with_strategy(ctx.strategy)
        .with_max_results(params.max_results.unwrap_or(state.settings.search.max_results));

    let results = if all {
        state.engine.search_all(&query, &ctx.credentials).await
    } else {
        state.engine.search(&query, &ctx.credentials).await
    };

    Json(SearchResponse {
        query: raw_query,
        strategy: ctx.strategy,
        number_of_results: results.len(),
        results,
    })
}

/// Strategy search, rescored
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> impl IntoResponse {
    run_search(&state, params, false).await
}

/// Every enabled provider, flattened
pub async fn search_all(State(state): State<AppState>, Query(params): Query<SearchParams>) -> impl IntoResponse {
    run_search(&state, params, true).await
}

fn document_info(document: Option<&DocumentContext>) -> DocumentInfo {
    match document {
        Some(doc) => DocumentInfo {
            loaded: doc.has_text(),
            name: doc.name.clone(),
            chars: doc.text.chars().count(),
        },
        None => DocumentInfo {
            loaded: false,
            name: String::new(),
            chars: 0,
        },
    }
}

pub async fn get_document(State(state): State<AppState>) -> Json<DocumentInfo> {
    let session = state.session.read().await;
    Json(document_info(session.document.as_ref()))
}

/// Replace the loaded document
pub async fn put_document(
    State(state): State<AppState>,
    Json(document): Json<DocumentContext>,
) -> Json<DocumentInfo> {
    let mut session = state.session.write().await;
    tracing::info!(
        "Document loaded: {} ({} chars)",
        document.name,
        document.text.chars().count()
    );
    session.document = Some(document);
    Json(document_info(session.document.as_ref()))
}

pub async fn delete_document(State(state): State<AppState>) -> StatusCode {
    state.session.write().await.document = None;
    StatusCode::NO_CONTENT
}

pub async fn get_flags(State(state): State<AppState>) -> Json<Flags> {
    let session = state.session.read().await;
    Json(Flags {
        use_doc: Some(session.use_doc),
        web_plus: Some(session.web_plus),
    })
}

pub async fn put_flags(State(state): State<AppState>, Json(update): Json<Flags>) -> Json<Flags> {
    let mut session = state.session.write().await;
    if let Some(use_doc) = update.use_doc {
        session.use_doc = use_doc;
    }
    if let Some(web_plus) = update.web_plus {
        session.web_plus = web_plus;
    }
    Json(Flags {
        use_doc: Some(session.use_doc),
        web_plus: Some(session.web_plus),
    })
}

/// Provider usage counters
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.engine.stats();
    Json(StatsResponse {
        total_searches: stats.total_searches(),
        providers: stats.snapshot(),
    })
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "name": state.instance_name(),
        "version": crate::VERSION
    }))
}
