//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use learnhub_auth::jwt::JwtDecoder;
use learnhub_cache::{CacheHandle, PresenceStore};
use learnhub_core::config::AppConfig;
use learnhub_core::traits::clock::Clock;
use learnhub_database::Stores;
use learnhub_service::presence::{HeartbeatService, PresenceQueryService, StatusClassifier};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped or cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Shared presence store connection
    pub cache: Arc<CacheHandle>,
    /// Presence record access
    pub presence_store: PresenceStore,
    /// Durable profile and cohort stores
    pub stores: Stores,
    /// Process start, for uptime reporting
    pub started_at: Instant,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Heartbeat ingest
    pub heartbeat_service: Arc<HeartbeatService>,
    /// Presence aggregation
    pub presence_service: Arc<PresenceQueryService>,
}

impl AppState {
    /// Wire services over the given stores and cache handle.
    pub fn new(
        config: Arc<AppConfig>,
        stores: Stores,
        cache: Arc<CacheHandle>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let presence_store = PresenceStore::new(Arc::clone(&cache), &config.presence);
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let heartbeat_service = Arc::new(HeartbeatService::new(
            Arc::clone(&stores.profiles),
            presence_store.clone(),
            Arc::clone(&clock),
            &config.presence,
        ));
        let presence_service = Arc::new(PresenceQueryService::new(
            presence_store.clone(),
            Arc::clone(&stores.profiles),
            Arc::clone(&stores.cohorts),
            clock,
            StatusClassifier::from_config(&config.presence),
        ));

        Self {
            config,
            cache,
            presence_store,
            stores,
            started_at: Instant::now(),
            jwt_decoder,
            heartbeat_service,
            presence_service,
        }
    }
}
