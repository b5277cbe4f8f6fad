//! End-to-end answer routing against mocked web endpoints

use haloai_rs::answer::{AnswerContext, AnswerOrchestrator, AnswerPath, Mode};
use haloai_rs::config::{Credentials, SearchSettings, Settings};
use haloai_rs::fallback::WebRetrievalFallback;
use haloai_rs::network::HttpClient;
use haloai_rs::document::DocumentContext;
use haloai_rs::web::AppState;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RUST_PAGE: &str = r#"<html><body>
<p>Rust is a systems programming language focused on safety and speed.</p>
<p>The Rust compiler enforces memory safety without a garbage collector.</p>
</body></html>"#;

const EMPTY_PAGE: &str = "<html><body><nav>Home</nav></body></html>";

fn settings_for(server: &MockServer) -> Settings {
    let mut settings = Settings::default();
    settings.search = SearchSettings {
        fallback_url: format!("{}/html/?q={{query}}", server.uri()),
        page_timeout_ms: 2000,
        ..Default::default()
    };
    settings
}

async fn mount_results(server: &MockServer, query: &str) {
    let results_page = format!(
        r#"<div class="result"><a class="result__a" href="{0}/rust">Rust</a></div>
           <div class="result"><a class="result__a" href="{0}/empty">Nothing</a></div>"#,
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RUST_PAGE))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_merged_web_text_comes_from_readable_pages_only() {
    let server = MockServer::start().await;
    mount_results(&server, "rust").await;

    let settings = settings_for(&server);
    let fallback = WebRetrievalFallback::new(HttpClient::new().unwrap(), &settings.search);

    let text = fallback.web_context("rust", 3).await;
    assert_eq!(text.matches("Rust").count(), 2);
    assert!(text.contains("memory safety"));
    assert!(!text.contains("Home"));

    let pages = fallback.gather("rust", 3).await;
    assert_eq!(pages.len(), 1);
    assert!(pages[0].url.ends_with("/rust"));
}

#[tokio::test]
async fn test_web_only_without_providers_scrapes() {
    let server = MockServer::start().await;
    mount_results(&server, "what is rust").await;

    let state = AppState::new(settings_for(&server), HttpClient::new().unwrap());
    let ctx = AnswerContext::new(Mode::WebOnly).with_credentials(Credentials::new());

    let answer = state.orchestrator.answer("what is rust", &ctx).await;
    assert_eq!(answer.path, AnswerPath::WebScrape);
    assert!(answer.answer.starts_with("From the web:\n• "));
    assert!(answer.answer.contains("systems programming language"));
    assert_eq!(state.engine.stats().total_searches(), 0);
}

#[tokio::test]
async fn test_nothing_found_apologizes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let state = AppState::new(settings_for(&server), HttpClient::new().unwrap());
    let ctx = AnswerContext::new(Mode::WebOnly);

    let answer = state.orchestrator.answer("obscure thing", &ctx).await;
    assert_eq!(answer.path, AnswerPath::Apology);
    assert_eq!(answer.answer, "I couldn’t find enough public info for “obscure thing”.");
}

#[tokio::test]
async fn test_document_hybrid_without_cloud_merges_web() {
    let server = MockServer::start().await;
    mount_results(&server, "rust safety").await;

    let state = AppState::new(settings_for(&server), HttpClient::new().unwrap());
    let document = DocumentContext::new(
        "notes.txt",
        "Our team picked Rust for the new service. Safety guarantees mattered more than build times.",
    );
    let ctx = AnswerContext::new(Mode::WebOnly)
        .with_flags(true, true)
        .with_document(Some(document));

    let answer = state.orchestrator.answer("web: rust safety", &ctx).await;
    assert_eq!(answer.path, AnswerPath::LocalHybrid);
    assert!(answer.answer.contains("From your document:"));
    assert!(answer.answer.contains("From the web:"));
}

#[test]
fn test_blank_query_short_circuits() {
    let settings = Settings::default();
    let state = AppState::new(settings, HttpClient::new().unwrap());
    let orchestrator: &AnswerOrchestrator = &state.orchestrator;
    let ctx = AnswerContext::new(Mode::Cloud);

    let answer = tokio_test::block_on(orchestrator.answer(" \t ", &ctx));
    assert_eq!(answer.path, AnswerPath::Empty);
    assert!(answer.answer.is_empty());
    assert_eq!(state.engine.stats().total_searches(), 0);
}
