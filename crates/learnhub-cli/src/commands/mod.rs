//! CLI command definitions and dispatch.

pub mod presence;
pub mod simulate;
pub mod token;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use learnhub_cache::{CacheHandle, PresenceStore};
use learnhub_core::config::AppConfig;
use learnhub_core::error::AppError;
use learnhub_core::traits::clock::{Clock, SystemClock};
use learnhub_database::Stores;
use learnhub_service::{PresenceQueryService, StatusClassifier};

/// LearnHub presence tooling
#[derive(Debug, Parser)]
#[command(name = "learnhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect live presence
    Presence(presence::PresenceArgs),
    /// Development access tokens
    Token(token::TokenArgs),
    /// Drive a heartbeat session against a running server
    Simulate(simulate::SimulateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(&self.config)?;
        match &self.command {
            Commands::Presence(args) => presence::execute(args, &config, self.format).await,
            Commands::Token(args) => token::execute(args, &config, self.format),
            Commands::Simulate(args) => simulate::execute(args, &config).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::from_file(config_path)
}

/// Connections opened for a presence query, released by [`QueryContext::close`].
pub struct QueryContext {
    /// Aggregation service over the configured stores.
    pub service: PresenceQueryService,
    store: PresenceStore,
    cache: Arc<CacheHandle>,
    stores: Stores,
}

impl QueryContext {
    /// Open the configured presence store and durable stores.
    pub async fn open(config: &AppConfig) -> Result<Self, AppError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let stores = Stores::connect(&config.database).await?;
        let cache = Arc::new(CacheHandle::new(
            config.cache.clone(),
            Arc::clone(&clock),
            config.presence.scan_batch_size,
        ));
        let store = PresenceStore::new(Arc::clone(&cache), &config.presence);

        let service = PresenceQueryService::new(
            store.clone(),
            Arc::clone(&stores.profiles),
            Arc::clone(&stores.cohorts),
            clock,
            StatusClassifier::from_config(&config.presence),
        );

        Ok(Self {
            service,
            store,
            cache,
            stores,
        })
    }

    /// Whether the presence store answers.
    pub async fn store_connected(&self) -> bool {
        self.store.is_available().await
    }

    /// Release connections.
    pub async fn close(self) {
        self.cache.close().await;
        self.stores.close().await;
    }
}
