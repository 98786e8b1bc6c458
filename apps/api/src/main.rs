use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sugarcheck::config::{Config, FeedMode};
use sugarcheck::llm_client::{self, LlmClient};
use sugarcheck::reading::{GlucoseFeed, LiveFeed, SyntheticFeed};
use sugarcheck::routes::with_layers;
use sugarcheck::{build_router, AppState};

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

    info!("Starting SugarCheck API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize CGM feed
    let feed: Arc<dyn GlucoseFeed> = match config.feed_mode {
        FeedMode::Live => Arc::new(LiveFeed::new(config.feed_url.clone())?),
        FeedMode::Synthetic => Arc::new(SyntheticFeed::new()),
    };
    info!("CGM feed initialized ({}: {})", feed.name(), config.feed_url);

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState::new(feed, Arc::new(llm), config.log_history_limit);

    let app = with_layers(
        build_router(state),
        Duration::from_secs(config.request_timeout_secs),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
