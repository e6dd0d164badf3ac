//! Cache manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use learnhub_core::config::cache::CacheConfig;
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_core::traits::cache::CacheProvider;
use learnhub_core::traits::clock::Clock;

/// Cache manager that wraps the configured cache provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// The inner cache provider.
    inner: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    ///
    /// `clock` drives expiry for the in-memory provider; `scan_batch_size`
    /// bounds the number of keys per bulk fetch for Redis.
    pub async fn new(
        config: &CacheConfig,
        clock: Arc<dyn Clock>,
        scan_batch_size: usize,
    ) -> AppResult<Self> {
        let inner: Arc<dyn CacheProvider> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis cache provider");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisCacheProvider::new(client, scan_batch_size))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory cache provider");
                Arc::new(crate::memory::MemoryCacheProvider::new(clock))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a cache manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn CacheProvider>) -> Self {
        Self { inner: provider }
    }

    /// Get a reference to the inner provider.
    pub fn provider(&self) -> &dyn CacheProvider {
        self.inner.as_ref()
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        self.inner.delete(key).await
    }

    async fn scan_prefix(&self, prefix: &str) -> AppResult<Vec<(String, String)>> {
        self.inner.scan_prefix(prefix).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
