mod config;
mod db;
mod errors;
mod extract;
mod interview;
mod llm_client;
mod models;
mod routes;
mod speech_client;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::interview::store::PgInterviewStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::speech_client::SpeechClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interviewer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database, config.db_max_connections).await?;

    // Initialize LLM client
    let llm = LlmClient::new(&config.llm_base_url, config.llm_api_key.clone())
        .with_max_attempts(config.llm_max_attempts);
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        llm_client::MODEL,
        llm.endpoint()
    );

    // Initialize TTS client
    let speech = SpeechClient::new(config.tts_url.clone());
    info!("TTS client initialized (endpoint: {})", config.tts_url);

    // Build app state
    let state = AppState {
        store: Arc::new(PgInterviewStore::new(db)),
        llm: Arc::new(llm),
        speech: Arc::new(speech),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // frontend is served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
