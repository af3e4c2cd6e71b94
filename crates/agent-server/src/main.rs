//! bagsense HTTP Server
//!
//! Axum-based chat server: every message is scanned for token addresses
//! and trending requests, enriched with live market and launchpad data,
//! and relayed to the LLM as JSON or server-sent events.

mod config;
mod handlers;
mod routes;
mod state;

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::LlmProvider;
use agent_runtime::OpenAiProvider;
use token_scout::{TokenFetcher, TokenScout};

use crate::config::{ChatMode, ServerConfig};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment first so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Initialize LLM provider
    let provider = Arc::new(OpenAiProvider::from_env());
    let base_url = provider.config().base_url.clone();

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to LLM API at {}", base_url);
            tracing::info!("  Model: {}", config.generation.model);
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ LLM API at {} not reachable - chat will fail", base_url);
            tracing::warn!("  Set LLM_API_KEY (or GROQ_API_KEY) in .env");
        }
    }

    // Initialize token data sources
    let fetcher = TokenFetcher::from_env();
    if fetcher.launchpad_configured() {
        tracing::info!("✓ bags.fm API configured");
    } else {
        tracing::warn!("⚠ bags.fm not configured - creator and fee data disabled");
        tracing::warn!("  Set BAGS_API_KEY in .env");
    }

    let static_dir = Path::new(&config.static_dir)
        .is_dir()
        .then_some(config.static_dir.as_str());
    if static_dir.is_none() {
        tracing::warn!(
            "⚠ Static directory '{}' not found - web client disabled",
            config.static_dir
        );
    }

    // Build application state
    let state = AppState {
        provider,
        scout: Arc::new(TokenScout::new(fetcher)),
        generation: Arc::new(config.generation.clone()),
        chat_mode: config.chat_mode,
    };

    let app = routes::router(state, static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    let mode = match config.chat_mode {
        ChatMode::Json => "json",
        ChatMode::Stream => "stream",
    };

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 bagsense server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  POST /api/chat        - Send message ({} reply)", mode);
    tracing::info!("  POST /api/chat/stream - Send message (SSE reply)");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
