mod config;
mod fixtures;
mod http;
mod models;
mod state;
mod store;
mod validation;

use std::sync::Arc;

use crate::config::{ApiConfig, LoggingConfig};
use crate::state::AppState;
use crate::store::WalletStore;
use anyhow::{Context, Result};
use axum::extract::Request;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ApiConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let store = WalletStore::seeded(&config.fixtures)
        .await
        .context("Failed to seed wallet store")?;
    let app_state = AppState::new(Arc::new(store));

    let listener = TcpListener::bind(config.server.address())
        .await
        .context("Failed to bind HTTP listener")?;
    let local_addr = listener
        .local_addr()
        .context("Failed to obtain listener address")?;
    info!("Testnet wallet API listening on {local_addr}");

    let app = http::app(app_state);
    axum::serve(
        listener,
        axum::ServiceExt::<Request>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server exited with error")?;

    info!("Testnet wallet API stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| logging.level.clone());
    assert!(!filter.is_empty(), "Tracing filter must not be empty");
    assert!(filter.len() < 256, "Tracing filter length exceeds bounds");

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false);
    if logging.json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Shutdown signal received");
}
