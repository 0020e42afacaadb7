mod config;
mod documents;
mod errors;
mod layout;
mod llm_client;
mod mail;
mod models;
mod render;
mod routes;
mod screening;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::documents::CandidateStore;
use crate::layout::default_page_config;
use crate::llm_client::LlmClient;
use crate::mail::ImapMailbox;
use crate::routes::build_router;
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

    info!("Starting Candidate Screener v{}", env!("CARGO_PKG_VERSION"));

    // Candidate directory (created if missing)
    let store = CandidateStore::open(&config.candidate_dir)?;

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let mailbox = ImapMailbox::new(config.imap_host.clone(), config.imap_port);
    info!("Mail sync via {}:{}", config.imap_host, config.imap_port);

    let page_config = default_page_config();
    info!(
        "Screening: top {} candidates, scoring concurrency {}",
        config.top_n, config.scoring_concurrency
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm: Arc::new(llm),
        mailbox: Arc::new(mailbox),
        store,
        page_config,
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
