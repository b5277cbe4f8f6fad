//! Answer orchestration
//!
//! Decision order for a query:
//! 1. Local mode: the local backend, document-grounded when the document applies.
//! 2. Document applies and web is wanted: hybrid answer, cloud when possible.
//! 3. Document applies: document answer, cloud when possible.
//! 4. Otherwise: web snippets, then cloud generation, then scraped pages.
//!
//! Every generation failure drops to the next tier. The last tier is an
//! apology naming the query.

use super::prompts;
use super::{AnswerContext, Mode};
use crate::document::{DocumentAnalyzer, HeuristicAnalyzer, Intent, CHUNK_SIZE};
use crate::fallback::WebRetrievalFallback;
use crate::llm::GenerationBackend;
use crate::query::QuerySignals;
use crate::search::{RaceEngine, SearchQuery};
use crate::summarize::{bullet_points, extractive_summary};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Web snippets shorter than this are not worth showing
const MIN_SNIPPET_CHARS: usize = 40;

/// Which branch produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerPath {
    Empty,
    LocalGeneration,
    LocalDocumentGeneration,
    DocumentExtract,
    CloudDocument,
    LocalHybrid,
    CloudHybrid,
    WebSnippets,
    CloudGeneric,
    WebScrape,
    Apology,
}

impl fmt::Display for AnswerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnswerPath::Empty => "empty",
            AnswerPath::LocalGeneration => "local_generation",
            AnswerPath::LocalDocumentGeneration => "local_document_generation",
            AnswerPath::DocumentExtract => "document_extract",
            AnswerPath::CloudDocument => "cloud_document",
            AnswerPath::LocalHybrid => "local_hybrid",
            AnswerPath::CloudHybrid => "cloud_hybrid",
            AnswerPath::WebSnippets => "web_snippets",
            AnswerPath::CloudGeneric => "cloud_generic",
            AnswerPath::WebScrape => "web_scrape",
            AnswerPath::Apology => "apology",
        };
        f.write_str(name)
    }
}

/// A composed answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub answer: String,
    pub path: AnswerPath,
    pub mode: Mode,
}

pub struct AnswerOrchestrator {
    engine: Arc<RaceEngine>,
    fallback: Arc<WebRetrievalFallback>,
    analyzer: Arc<dyn DocumentAnalyzer>,
    cloud: Arc<dyn GenerationBackend>,
    local: Arc<dyn GenerationBackend>,
    instance_name: String,
    /// Results asked from each provider for snippets
    snippet_results: usize,
    /// Pages scraped when no snippets came back
    scrape_links: usize,
}

impl AnswerOrchestrator {
    pub fn new(
        engine: Arc<RaceEngine>,
        fallback: Arc<WebRetrievalFallback>,
        cloud: Arc<dyn GenerationBackend>,
        local: Arc<dyn GenerationBackend>,
    ) -> Self {
        Self {
            engine,
            fallback,
            analyzer: Arc::new(HeuristicAnalyzer::new()),
            cloud,
            local,
            instance_name: "HaloAI".to_string(),
            snippet_results: 4,
            scrape_links: 4,
        }
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = name.into();
        self
    }

    pub fn with_snippet_results(mut self, n: usize) -> Self {
        self.snippet_results = n.max(1);
        self
    }

    /// Answer a query under the given context; never fails
    pub async fn answer(&self, query: &str, ctx: &AnswerContext) -> Answer {
        let span = info_span!("answer", request_id = %Uuid::new_v4(), mode = %ctx.mode);
        self.route(query, ctx).instrument(span).await
    }

    async fn route(&self, query: &str, ctx: &AnswerContext) -> Answer {
        let signals = QuerySignals::parse(query);
        if signals.is_empty() {
            return Answer {
                answer: String::new(),
                path: AnswerPath::Empty,
                mode: ctx.mode,
            };
        }

        let document = ctx
            .document_text()
            .filter(|_| ctx.use_doc || signals.mentions_document);

        let (answer, path) = match (ctx.mode, document) {
            (Mode::Local, Some(doc)) => self.local_document_generation(&signals, doc, ctx).await,
            (Mode::Local, None) => self.local_generation(&signals, ctx).await,
            (mode, Some(doc)) => {
                let cloud_ready = mode == Mode::Cloud && self.cloud.is_configured(&ctx.credentials);
                if ctx.web_plus || signals.wants_web() {
                    self.hybrid(&signals, doc, ctx, cloud_ready).await
                } else if cloud_ready {
                    self.cloud_document(&signals, doc, ctx).await
                } else {
                    (self.document_extract(&signals.query, doc), AnswerPath::DocumentExtract)
                }
            }
            (mode, None) => self.generic(&signals, ctx, mode).await,
        };

        info!("path={} chars={}", path, answer.chars().count());

        Answer {
            answer,
            path,
            mode: ctx.mode,
        }
    }

    async fn local_generation(&self, signals: &QuerySignals, ctx: &AnswerContext) -> (String, AnswerPath) {
        match self
            .local
            .complete(prompts::local(signals.query.as_str()), &ctx.credentials)
            .await
        {
            Ok(text) => (text, AnswerPath::LocalGeneration),
            Err(e) => {
                warn!("Local generation failed: {}", e);
                (prompts::no_public_info(&signals.query), AnswerPath::Apology)
            }
        }
    }

    async fn local_document_generation(
        &self,
        signals: &QuerySignals,
        doc: &str,
        ctx: &AnswerContext,
    ) -> (String, AnswerPath) {
        let q = signals.query.as_str();
        let intent = self.analyzer.classify_intent(q);
        let context = self.document_context(q, doc, intent, 10);
        let request = prompts::local_document(&self.instance_name, &context, &prompts::local_task(intent, q));

        match self.local.complete(request, &ctx.credentials).await {
            Ok(text) => (text, AnswerPath::LocalDocumentGeneration),
            Err(e) => {
                warn!("Local document generation failed: {}", e);
                (self.document_extract(q, doc), AnswerPath::DocumentExtract)
            }
        }
    }

    async fn cloud_document(&self, signals: &QuerySignals, doc: &str, ctx: &AnswerContext) -> (String, AnswerPath) {
        let q = signals.query.as_str();
        let intent = self.analyzer.classify_intent(q);
        let context = self.document_context(q, doc, intent, 12);
        let request = prompts::cloud_document(&self.instance_name, &context, &prompts::cloud_task(intent, q));

        match self.cloud.complete(request, &ctx.credentials).await {
            Ok(text) => (text, AnswerPath::CloudDocument),
            Err(e) => {
                warn!("Cloud document answer failed: {}", e);
                (self.document_extract(q, doc), AnswerPath::DocumentExtract)
            }
        }
    }

    async fn hybrid(
        &self,
        signals: &QuerySignals,
        doc: &str,
        ctx: &AnswerContext,
        cloud_ready: bool,
    ) -> (String, AnswerPath) {
        let q = signals.query.as_str();
        let links = if cloud_ready { self.scrape_links } else { 3 };
        let web = self.web_context(signals, ctx, links).await;

        if cloud_ready {
            let intent = self.analyzer.classify_intent(q);
            let context = self.document_context(q, doc, intent, 10);
            let request = prompts::cloud_hybrid(&self.instance_name, q, &context, &web);

            match self.cloud.complete(request, &ctx.credentials).await {
                Ok(text) => return (text, AnswerPath::CloudHybrid),
                Err(e) => warn!("Cloud hybrid answer failed: {}", e),
            }
        }

        (self.local_hybrid(q, doc, &web), AnswerPath::LocalHybrid)
    }

    async fn generic(&self, signals: &QuerySignals, ctx: &AnswerContext, mode: Mode) -> (String, AnswerPath) {
        let snippets = self.web_snippets(signals, ctx).await;
        if !snippets.is_empty() {
            return (prompts::web_bullets(&snippets), AnswerPath::WebSnippets);
        }

        if mode == Mode::Cloud && self.cloud.is_configured(&ctx.credentials) {
            let request = prompts::cloud_generic(&self.instance_name, &signals.query);
            match self.cloud.complete(request, &ctx.credentials).await {
                Ok(text) => return (text, AnswerPath::CloudGeneric),
                Err(e) => warn!("Cloud answer failed: {}", e),
            }
        }

        self.scrape_answer(signals).await
    }

    /// Per-page summaries of scraped results
    async fn scrape_answer(&self, signals: &QuerySignals) -> (String, AnswerPath) {
        let pages = self
            .fallback
            .gather(signals.search_text(), self.scrape_links)
            .await;

        let summaries: Vec<String> = pages
            .iter()
            .map(|p| extractive_summary(&p.text, &signals.query, 4))
            .filter(|s| !s.is_empty())
            .collect();

        if summaries.is_empty() {
            (prompts::no_public_info(&signals.query), AnswerPath::Apology)
        } else {
            (prompts::web_bullets(&summaries), AnswerPath::WebScrape)
        }
    }

    /// Provider snippets long enough to show
    async fn web_snippets(&self, signals: &QuerySignals, ctx: &AnswerContext) -> Vec<String> {
        let query = SearchQuery::new(signals.search_text())
            .with_strategy(ctx.strategy)
            .with_max_results(self.snippet_results);

        let snippets: Vec<String> = self
            .engine
            .search(&query, &ctx.credentials)
            .await
            .into_iter()
            .map(|r| r.snippet)
            .filter(|s| s.chars().count() > MIN_SNIPPET_CHARS)
            .collect();

        debug!("{} usable web snippets", snippets.len());
        snippets
    }

    /// Snippets joined by lines, or scraped page text when there are none
    async fn web_context(&self, signals: &QuerySignals, ctx: &AnswerContext, links: usize) -> String {
        let snippets = self.web_snippets(signals, ctx).await;
        if !snippets.is_empty() {
            return snippets.join("\n");
        }
        self.fallback.web_context(signals.search_text(), links).await
    }

    /// Relevant chunks for questions, leading chunks otherwise
    fn document_context(&self, q: &str, doc: &str, intent: Intent, leading: usize) -> String {
        match intent {
            Intent::Qa => self.analyzer.select_relevant(q, doc, 6).join("\n\n"),
            _ => self
                .analyzer
                .chunk(doc, CHUNK_SIZE)
                .into_iter()
                .take(leading)
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }

    /// Document answer without any generation backend
    fn document_extract(&self, q: &str, doc: &str) -> String {
        match self.analyzer.classify_intent(q) {
            Intent::Summarize => {
                let summary = extractive_summary(doc, "", 10);
                if summary.is_empty() {
                    prompts::NO_SUMMARY.to_string()
                } else {
                    summary
                }
            }
            Intent::Highlights => {
                let summary = extractive_summary(doc, "", 12);
                if summary.is_empty() {
                    prompts::NO_HIGHLIGHTS.to_string()
                } else {
                    format!("{}\n{}", prompts::KEY_POINTS, bullet_points(&summary, 8))
                }
            }
            Intent::Qa => {
                let context = self.analyzer.select_relevant(q, doc, 6).join("\n\n");
                let answer = extractive_summary(&context, q, 8);
                if answer.is_empty() {
                    prompts::NO_DOC_ANSWER.to_string()
                } else {
                    answer
                }
            }
        }
    }

    /// Labelled document and web sections
    fn local_hybrid(&self, q: &str, doc: &str, web: &str) -> String {
        let doc_part = match self.analyzer.classify_intent(q) {
            Intent::Summarize => extractive_summary(doc, "", 10),
            Intent::Highlights => extractive_summary(doc, "", 12),
            Intent::Qa => {
                let context = self.analyzer.select_relevant(q, doc, 6).join("\n\n");
                extractive_summary(&context, q, 7)
            }
        };
        let web_part = extractive_summary(web, q, 6);

        if doc_part.is_empty() && web_part.is_empty() {
            return prompts::no_hybrid_info(q);
        }

        let mut out = String::new();
        if !doc_part.is_empty() {
            out.push_str(&format!("{}\n{}\n\n", prompts::FROM_DOCUMENT, doc_part));
        }
        if !web_part.is_empty() {
            out.push_str(&format!("{}\n{}", prompts::FROM_WEB, web_part));
        }
        out.trim().to_string()
    }
}
