//! HaloAI-RS server entry point

use anyhow::Result;
use haloai_rs::{
    config,
    network::HttpClient,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-V" | "--version" => {
                println!("haloai-rs {}", haloai_rs::VERSION);
                return Ok(());
            }
            _ => {}
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Starting HaloAI-RS v{}", haloai_rs::VERSION);

    let settings = config::load()?;
    info!(
        "Loaded configuration for instance: {} (default mode={}, strategy={})",
        settings.general.instance_name, settings.answer.mode, settings.search.strategy
    );

    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    let state = AppState::new(settings, client);
    info!("Registered {} search providers", state.engine.registry().len());

    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
HaloAI-RS v{}
A retrieval-augmented answer engine

USAGE:
    haloai-rs [OPTIONS]

OPTIONS:
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    HALO_SETTINGS_PATH     Path to settings.yml
    HALO_DEBUG             Enable debug mode (true/false)
    HALO_PORT              Server port
    HALO_BIND_ADDRESS      Bind address
    AI_MODE                local | web | cloud
    SEARCH_MODE            fastest | cheapest | accurate
    OPENAI_API_KEY         Cloud generation key
    FALLBACK_MODEL         Cloud model override
    OLLAMA_URL             Local generation server
    OLLAMA_MODEL           Local model
    BING_API_KEY, SERPAPI_KEY, GOOGLE_PSE_KEY, GOOGLE_PSE_CX,
    BRAVE_API_KEY, GROQ_API_KEY
                           Search provider credentials
    RUST_LOG               Log filter (default: info)
"#,
        haloai_rs::VERSION
    );
}
