// Plant server binary entry point
//
// Purpose: Serve the Home / Plant Details / Plant Database pages
// Usage: cargo run --bin plant_server

use anyhow::Context;
use mera_paudha::{create_router, AppConfig, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Secrets and settings may live in a local .env file
    let dotenv = dotenvy::dotenv();

    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "mera_paudha=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match dotenv {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to read .env file: {}", e),
    }

    tracing::info!("Starting plant server...");

    let config = AppConfig::from_env();
    tracing::info!("Configuration:");
    tracing::info!("  STORE_PATH: {}", config.store_path.display());
    tracing::info!("  PROVIDER: {} ({})", config.provider.base_url, config.provider.model);
    tracing::info!("  PORT: {}", config.port);
    match &config.sync {
        Some(sync) => tracing::info!("  SYNC: {} -> {}", sync.repo_dir.display(), sync.remote),
        None => tracing::info!("  SYNC: disabled"),
    }
    if config.provider.api_key.is_none() {
        tracing::warn!("API_KEY is not set; profile generation will be rejected by the provider");
    }

    let state = AppState::new(&config).context("Failed to initialize application state")?;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
