//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use learnhub_auth::jwt::JwtEncoder;
use learnhub_cache::{CacheHandle, CacheManager};
use learnhub_core::config::AppConfig;
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_core::traits::cache::CacheProvider;
use learnhub_core::traits::clock::{Clock, ManualClock};
use learnhub_database::Stores;
use learnhub_database::memory::{MemoryCohortStore, MemoryProfileStore};
use learnhub_entity::cohort::Cohort;
use learnhub_entity::user::{UserProfile, UserRole};

/// Wall-clock start for every test app, epoch milliseconds.
pub const T0: i64 = 1_760_000_000_000;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Clock driving presence ages and record expiry
    pub clock: Arc<ManualClock>,
    /// Profile store backing the app
    pub profiles: MemoryProfileStore,
    /// Cohort store backing the app
    pub cohorts: MemoryCohortStore,
    encoder: JwtEncoder,
}

impl TestApp {
    /// Create a test application over in-memory stores.
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(T0));
        let config = Self::test_config();
        let cache = CacheHandle::new(
            config.cache.clone(),
            clock.clone(),
            config.presence.scan_batch_size,
        );
        Self::build(config, cache, clock)
    }

    /// Create a test application whose presence store refuses every call.
    pub fn with_unreachable_store() -> Self {
        let clock = Arc::new(ManualClock::new(T0));
        let manager = CacheManager::from_provider(Arc::new(UnreachableCache));
        let cache = CacheHandle::from_manager(manager, clock.clone());
        Self::build(Self::test_config(), cache, clock)
    }

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.cache.provider = "memory".to_string();
        config.database.provider = "memory".to_string();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config
    }

    fn build(config: AppConfig, cache: CacheHandle, clock: Arc<ManualClock>) -> Self {
        let profiles = MemoryProfileStore::new();
        let cohorts = MemoryCohortStore::new();
        let stores = Stores::in_memory(profiles.clone(), cohorts.clone());
        let dyn_clock: Arc<dyn Clock> = clock.clone();

        let state = learnhub_api::AppState::new(
            Arc::new(config.clone()),
            stores,
            Arc::new(cache),
            dyn_clock,
        );
        let router = learnhub_api::build_app(state);
        let encoder = JwtEncoder::new(&config.auth);

        Self {
            router,
            config,
            clock,
            profiles,
            cohorts,
            encoder,
        }
    }

    /// Create a profile and return its user ID.
    pub fn create_user(&self, subject: &str, name: &str, role: UserRole) -> Uuid {
        let profile = UserProfile::new(subject, name, role);
        let id = profile.id;
        self.profiles.insert(profile);
        id
    }

    /// Create a cohort and return its ID.
    pub fn create_cohort(&self, name: &str, member_ids: Vec<Uuid>) -> Uuid {
        let id = Uuid::new_v4();
        self.cohorts.insert(Cohort {
            id,
            name: name.to_string(),
            member_ids,
        });
        id
    }

    /// Mint an access token for `subject`.
    pub fn token(&self, subject: &str, role: UserRole) -> String {
        let (token, _) = self
            .encoder
            .issue_access_token(subject, role, subject)
            .expect("Failed to mint token");
        token
    }

    /// Let detached mirror writes finish.
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req.body(Body::empty()).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

#[derive(Debug)]
struct UnreachableCache;

#[async_trait]
impl CacheProvider for UnreachableCache {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Err(AppError::cache("connection refused"))
    }
    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
        Err(AppError::cache("connection refused"))
    }
    async fn delete(&self, _key: &str) -> AppResult<bool> {
        Err(AppError::cache("connection refused"))
    }
    async fn scan_prefix(&self, _prefix: &str) -> AppResult<Vec<(String, String)>> {
        Err(AppError::cache("connection refused"))
    }
    async fn health_check(&self) -> AppResult<bool> {
        Err(AppError::cache("connection refused"))
    }
}
