//! crypto-chat HTTP Server
//!
//! Axum-based server running the crypto price agent behind a small
//! session-oriented REST API.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{AgentBuilder, LlmProvider, SessionStore};
use agent_runtime::{OpenAiConfig, OpenAiProvider};
use crypto_market::{
    CRYPTO_BOT_NAME, CRYPTO_BOT_PROMPT, Dispatcher, DispatcherConfig, MarketService,
    exchange::{BinanceClient, ExchangeClient},
    tools::{MarketDataTool, PriceLookupTool},
};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // LLM provider
    let mut llm_config = OpenAiConfig::from_env().context("LLM provider is not configured")?;
    llm_config.timeout_secs = config.request_timeout.as_secs();
    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::from_config(llm_config)?);

    if provider.health_check().await.unwrap_or(false) {
        tracing::info!("✓ Connected to LLM endpoint ({})", provider.name());
    } else {
        tracing::warn!("⚠ LLM endpoint not reachable - chat turns will report errors");
        tracing::warn!("  Check GEMINI_API_KEY and LLM_BASE_URL in .env");
    }

    // Market data
    let exchange: Arc<dyn ExchangeClient> = Arc::new(BinanceClient::new(
        config.binance_api_url.as_str(),
        config.request_timeout,
    )?);
    if !exchange.health_check().await {
        tracing::warn!("⚠ Binance not reachable at {}", config.binance_api_url);
    }
    let market = Arc::new(MarketService::new(exchange));

    // Agent
    let agent = AgentBuilder::new()
        .provider(provider.clone())
        .name(CRYPTO_BOT_NAME)
        .system_prompt(CRYPTO_BOT_PROMPT)
        .model(config.llm_model.as_str())
        .tool(PriceLookupTool::new(market.clone()))
        .tool(MarketDataTool::new(market.clone()))
        .build()?;

    tracing::info!("Registered {} tools:", agent.tools().len());
    for name in agent.tools().names() {
        tracing::info!("  • {}", name);
    }

    let dispatcher = Dispatcher::new(
        Arc::new(agent),
        market.clone(),
        DispatcherConfig {
            default_symbol: config.default_symbol.clone(),
            agent_timeout: config.request_timeout,
        },
    );

    let sessions = Arc::new(SessionStore::new());
    spawn_session_pruner(sessions.clone(), config.session_ttl);

    let state = AppState {
        provider,
        market,
        dispatcher: Arc::new(dispatcher),
        sessions,
    };

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 crypto-chat server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET    /health            - Health check");
    tracing::info!("  GET    /api/models        - List available models");
    tracing::info!("  POST   /api/sessions      - Open a session");
    tracing::info!("  GET    /api/sessions/{{id}} - Session transcript");
    tracing::info!("  DELETE /api/sessions/{{id}} - Close a session");
    tracing::info!("  POST   /api/chat          - Send message");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drop sessions idle for longer than `ttl`
fn spawn_session_pruner(sessions: Arc<SessionStore>, ttl: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ttl.min(Duration::from_secs(60)));
        loop {
            ticker.tick().await;
            let removed = sessions.prune(ttl).await;
            if removed > 0 {
                let remaining = sessions.len().await;
                tracing::info!(removed, remaining, "Pruned idle sessions");
            }
        }
    });
}
