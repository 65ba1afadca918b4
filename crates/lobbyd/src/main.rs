//! lobbyd — game server lobby daemon.

use std::sync::Arc;

use anyhow::{Context, Result};

use lobby_core::config::LobbyConfig;
use lobby_registry::{new_registry, SystemClock};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config
    if let Err(e) = LobbyConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let config = LobbyConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        LobbyConfig::default()
    });

    tracing::info!(
        ttl_secs = config.registry.ttl_secs,
        trust_forwarded_for = config.api.trust_forwarded_for,
        "lobbyd starting"
    );
    if config.api.trust_forwarded_for {
        tracing::warn!("trusting X-Forwarded-For — only safe behind a reverse proxy");
    }

    let registry = new_registry(config.registry.ttl_secs, Arc::new(SystemClock));
    let state = lobby_api::ApiState::new(registry, config.api.trust_forwarded_for);

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("shutdown signal received");
    };

    lobby_api::serve(state, &config.api.socket_addr(), shutdown)
        .await
        .context("API server failed")?;

    tracing::info!("shutting down");
    Ok(())
}
