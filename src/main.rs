use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use telegram_ingest::config::Config;
use telegram_ingest::handlers;
use telegram_ingest::webhook::{self, AppState, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Initialize logging; RUST_LOG overrides the configured level
    let level = config.logging.level.as_directive();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{level},telegram_ingest={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Telegram Ingestion Service v{}", VERSION);
    info!("Loaded configuration from: {}", config_path.display());
    info!("  Log level: {}", config.logging.level);
    info!("  Handler: {}", config.handler.kind);
    info!("  Handler timeout: {:?}", config.handler.timeout());
    if config.telegram.webhook_url.is_empty() {
        warn!("webhook_url not set - remember to register your webhook");
    } else {
        info!("  Webhook URL: {}", config.telegram.webhook_url);
    }

    let handler = handlers::build(&config.handler)?;
    let state = AppState::new(
        &config.telegram.webhook_secret,
        handler,
        config.handler.timeout(),
    );

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!("Listening on {}", addr);

    axum::serve(listener, webhook::router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Server error")?;

    info!("Shutting down Telegram Ingestion Service");
    Ok(())
}
