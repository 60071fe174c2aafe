mod config;
mod errors;
mod evaluation;
mod interview;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::evaluation::headings::HeadingTable;
use crate::evaluation::sanitizer::SanitizerOptions;
use crate::evaluation::EvaluationParser;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize model client
    let llm = LlmClient::new(&config).context("Failed to build HTTP client")?;
    info!(
        "LLM client initialized (model: {}, tts: {})",
        llm.model(),
        if config.enable_tts { "on" } else { "off" }
    );

    // Compile the evaluation parser
    let parser = build_parser(&config)?;

    let state = AppState {
        llm: Arc::new(llm),
        parser: Arc::new(parser),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web client's host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the evaluation parser from the configured heading table, or the
/// built-in one when none is configured.
fn build_parser(config: &Config) -> Result<EvaluationParser> {
    let table = match &config.evaluation_headings_path {
        Some(path) => {
            let table = HeadingTable::from_json_file(path)
                .with_context(|| format!("Failed to load heading table from '{path}'"))?;
            info!("Evaluation heading table loaded from {path}");
            table
        }
        None => HeadingTable::default(),
    };

    let options = SanitizerOptions {
        default_code_language: config.ideal_response_default_language.clone(),
    };

    EvaluationParser::new(&table, options).context("Invalid evaluation heading table")
}
