//! LearnHub presence server.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use learnhub_api::AppState;
use learnhub_cache::CacheHandle;
use learnhub_core::config::{AppConfig, LoggingConfig};
use learnhub_core::error::AppError;
use learnhub_core::traits::clock::{Clock, SystemClock};
use learnhub_database::Stores;

#[tokio::main]
async fn main() {
    let env = std::env::var("LEARNHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LearnHub v{}", env!("CARGO_PKG_VERSION"));
    let config = Arc::new(config);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // ── Step 1: Durable stores ───────────────────────────────────
    tracing::info!(provider = %config.database.provider, "Opening profile stores");
    let stores = Stores::connect(&config.database).await?;

    // ── Step 2: Presence store handle (connects on first use) ────
    tracing::info!(provider = %config.cache.provider, "Configuring presence store");
    let cache = Arc::new(CacheHandle::new(
        config.cache.clone(),
        Arc::clone(&clock),
        config.presence.scan_batch_size,
    ));

    // ── Step 3: Services and HTTP server ─────────────────────────
    let state = AppState::new(
        Arc::clone(&config),
        stores.clone(),
        Arc::clone(&cache),
        clock,
    );

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let served = learnhub_api::run_server(state, shutdown_signal()).await;

    // ── Step 4: Teardown ─────────────────────────────────────────
    tracing::info!("Releasing presence store and database connections");
    if tokio::time::timeout(grace, async {
        cache.close().await;
        stores.close().await;
    })
    .await
    .is_err()
    {
        tracing::warn!(grace_seconds = grace.as_secs(), "Teardown exceeded grace period");
    }

    served?;
    tracing::info!("LearnHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
