//! Application state shared across handlers

use crate::answer::{AnswerContext, AnswerOrchestrator};
use crate::config::Settings;
use crate::document::DocumentContext;
use crate::fallback::WebRetrievalFallback;
use crate::llm::{OllamaBackend, OpenAiBackend};
use crate::metrics::ProviderStats;
use crate::network::HttpClient;
use crate::providers::ProviderRegistry;
use crate::search::RaceEngine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Mutable per-process session: the loaded document and the answer flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub document: Option<DocumentContext>,
    pub use_doc: bool,
    pub web_plus: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Provider race engine
    pub engine: Arc<RaceEngine>,
    /// Answer orchestrator
    pub orchestrator: Arc<AnswerOrchestrator>,
    /// Loaded document and flags
    pub session: Arc<RwLock<Session>>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, client: HttpClient) -> Self {
        let registry = Arc::new(ProviderRegistry::with_defaults(&settings));
        let stats = Arc::new(ProviderStats::new());

        let engine = Arc::new(
            RaceEngine::new(client.clone(), registry, stats)
                .with_timeout(Duration::from_millis(settings.search.timeout_ms))
                .with_top_n(settings.search.top_n),
        );
        let fallback = Arc::new(WebRetrievalFallback::new(client.clone(), &settings.search));

        let generation_timeout = Duration::from_millis(settings.answer.timeout_ms);
        let cloud = Arc::new(
            OpenAiBackend::new(client.clone(), &settings.answer.cloud_url, &settings.answer.model)
                .with_timeout(generation_timeout),
        );
        let local = Arc::new(
            OllamaBackend::new(client, &settings.answer.local_url, &settings.answer.local_model)
                .with_timeout(generation_timeout),
        );

        let orchestrator = AnswerOrchestrator::new(engine.clone(), fallback, cloud, local)
            .with_instance_name(&settings.general.instance_name)
            .with_snippet_results(settings.search.top_n);

        Self::from_parts(settings, engine, orchestrator)
    }

    /// Assemble state from already-built components
    pub fn from_parts(settings: Settings, engine: Arc<RaceEngine>, orchestrator: AnswerOrchestrator) -> Self {
        Self {
            settings: Arc::new(settings),
            engine,
            orchestrator: Arc::new(orchestrator),
            session: Arc::new(RwLock::new(Session::default())),
        }
    }

    /// Snapshot everything an answer call needs
    pub async fn answer_context(&self) -> AnswerContext {
        let session = self.session.read().await;
        AnswerContext::capture(&self.settings)
            .with_flags(session.use_doc, session.web_plus)
            .with_document(session.document.clone())
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
