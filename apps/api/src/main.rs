mod config;
mod errors;
mod extract;
mod llm_client;
mod models;
mod readiness;
mod review;
mod routes;
mod sessions;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extract::PdfTextExtractor;
use crate::llm_client::{ChatCapability, LlmClient};
use crate::readiness::{spawn_readiness_probe, Readiness};
use crate::routes::build_router;
use crate::sessions::SessionStore;
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

    info!("Starting Resume Review API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let chat: Arc<dyn ChatCapability> = Arc::new(LlmClient::new(
        config.chat_api_key.clone(),
        &config.chat_api_base_url,
        Duration::from_secs(config.llm_timeout_secs),
    )?);
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        llm_client::MODEL,
        config.chat_api_base_url
    );

    // Uploads stay disabled until the chat endpoint answers once
    let readiness = Readiness::default();
    spawn_readiness_probe(
        readiness.clone(),
        chat.clone(),
        Duration::from_millis(config.readiness_probe_interval_ms),
    );
    {
        let readiness = readiness.clone();
        tokio::spawn(async move {
            readiness.wait_ready().await;
            info!("Chat capability ready; uploads enabled");
        });
    }

    info!(
        "JSON extraction: {:?}, upload limit: {} bytes",
        config.json_extraction, config.max_upload_bytes
    );

    // Build app state
    let state = AppState {
        chat,
        extractor: Arc::new(PdfTextExtractor),
        sessions: SessionStore::new(Duration::from_secs(config.session_ttl_secs)),
        readiness,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
