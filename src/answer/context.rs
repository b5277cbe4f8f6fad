//! Per-call answer context

use super::Mode;
use crate::config::{Credentials, Settings};
use crate::document::DocumentContext;
use crate::search::Strategy;

/// Everything one `answer` call routes on, captured when the call starts
///
/// Later changes to flags, environment or the loaded document do not affect
/// a call that already holds its context.
#[derive(Debug, Clone)]
pub struct AnswerContext {
    pub mode: Mode,
    /// Ground answers in the document even when the query does not mention it
    pub use_doc: bool,
    /// Add web results to document answers
    pub web_plus: bool,
    pub strategy: Strategy,
    pub credentials: Credentials,
    pub document: Option<DocumentContext>,
}

impl AnswerContext {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            use_doc: false,
            web_plus: false,
            strategy: Strategy::default(),
            credentials: Credentials::new(),
            document: None,
        }
    }

    /// Snapshot mode, strategy and credentials from the environment over settings
    ///
    /// `AI_MODE` and `SEARCH_MODE` are read here, never folded into `settings`,
    /// so unsetting them falls back to the configured values.
    pub fn capture(settings: &Settings) -> Self {
        Self::resolve(settings, Mode::from_env(), Strategy::from_env())
            .with_credentials(Credentials::from_env_over(&settings.credentials))
    }

    fn resolve(settings: &Settings, mode: Option<Mode>, strategy: Option<Strategy>) -> Self {
        Self {
            strategy: strategy.unwrap_or(settings.search.strategy),
            ..Self::new(mode.unwrap_or(settings.answer.mode))
        }
    }

    pub fn with_flags(mut self, use_doc: bool, web_plus: bool) -> Self {
        self.use_doc = use_doc;
        self.web_plus = web_plus;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_document(mut self, document: Option<DocumentContext>) -> Self {
        self.document = document;
        self
    }

    /// Text of the loaded document, if it has any
    pub fn document_text(&self) -> Option<&str> {
        self.document
            .as_ref()
            .filter(|d| d.has_text())
            .map(|d| d.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_document_does_not_count() {
        let ctx = AnswerContext::new(Mode::Cloud)
            .with_document(Some(DocumentContext::new("empty.txt", "  ")));
        assert!(ctx.document_text().is_none());

        let ctx = ctx.with_document(Some(DocumentContext::new("a.txt", "body")));
        assert_eq!(ctx.document_text(), Some("body"));
    }

    #[test]
    fn test_unset_env_falls_back_to_configured_mode() {
        let ctx = AnswerContext::resolve(&Settings::default(), None, None);
        assert_eq!(ctx.mode, Mode::Cloud);
        assert_eq!(ctx.strategy, Strategy::Fastest);

        let settings: Settings =
            serde_yaml::from_str("answer:\n  mode: local\nsearch:\n  strategy: cheapest\n").unwrap();
        let ctx = AnswerContext::resolve(&settings, None, None);
        assert_eq!(ctx.mode, Mode::Local);
        assert_eq!(ctx.strategy, Strategy::Cheapest);

        let ctx = AnswerContext::resolve(&settings, Some(Mode::WebOnly), Some(Strategy::Accurate));
        assert_eq!(ctx.mode, Mode::WebOnly);
        assert_eq!(ctx.strategy, Strategy::Accurate);
        assert_eq!(settings.answer.mode, Mode::Local);
    }

    #[test]
    fn test_capture_uses_settings_credentials() {
        let mut settings = Settings::default();
        settings
            .credentials
            .insert("HALO_CONTEXT_TEST_KEY".to_string(), "v".to_string());
        let ctx = AnswerContext::capture(&settings);
        assert_eq!(ctx.credentials.get("HALO_CONTEXT_TEST_KEY"), Some("v"));
        assert!(!ctx.use_doc);
        assert!(ctx.document.is_none());
    }
}
