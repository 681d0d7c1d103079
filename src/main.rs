//! Synced Lyrics Server
//!
//! Serves the landing page's synced-lyrics demo: lyric data, and display
//! sessions whose playback clock runs only while the surface is in view.

mod config;
mod config_file;
mod error;
mod http;
mod metrics;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::http::create_router;
use crate::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "synced-lyrics-server";

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let first = args.next();

    // `--generate-config [path]` writes the defaults and exits
    if first.as_deref() == Some("--generate-config") {
        let path = args.next().unwrap_or_else(|| "config.toml".to_string());
        crate::config_file::generate_default_config(&path)?;
        println!("Wrote default configuration to {}", path);
        return Ok(());
    }

    // Load configuration
    let config_path = first.unwrap_or_else(|| "config.toml".to_string());
    let (config, config_error) = crate::config_file::load_config(&config_path);

    // Initialize logging
    init_logging(&config);

    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    if let Some(e) = config_error {
        tracing::warn!(
            "Failed to load config file {}: {}. Using defaults.",
            config_path,
            e
        );
    }
    tracing::info!("Configuration loaded: {:?}", config);

    // Create application state
    let state = Arc::new(AppState::new(config.clone()));
    tracing::info!(
        "Serving '{}' with {} lyric lines",
        state.track.title,
        state.track.lyrics.len()
    );

    // Background task: evict idle sessions.
    {
        let state_bg = Arc::clone(&state);
        let period = Duration::from_secs(config.sessions.cleanup_interval_secs.max(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let removed = state_bg.cleanup_expired_sessions();
                if removed > 0 {
                    tracing::info!("Evicted {} idle session(s)", removed);
                }
            }
        });
    }

    // Build router
    let app = create_router(state.clone());

    // Start server
    let addr: SocketAddr = config
        .socket_addr()
        .parse()
        .map_err(|e| ServerError::Config(format!("invalid listen address: {}", e)))?;
    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown();
    tracing::info!("{} stopped", APP_NAME);

    Ok(())
}

/// Initialize logging with tracing
fn init_logging(config: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "synced_lyrics_server={level},synced_lyrics_lib={level},tower_http=debug",
            level = config.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolve on Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
