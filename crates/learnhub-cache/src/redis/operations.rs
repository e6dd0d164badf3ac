//! Redis cache provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_core::traits::cache::CacheProvider;

use super::client::RedisClient;

/// Redis-backed cache provider.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    /// Redis client.
    client: RedisClient,
    /// Keys per SCAN page and per MGET chunk.
    batch_size: usize,
}

impl RedisCacheProvider {
    /// Create a new Redis cache provider.
    pub fn new(client: RedisClient, batch_size: usize) -> Self {
        Self {
            client,
            batch_size: batch_size.max(1),
        }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }

    /// Collect every key matching `pattern` with a SCAN cursor loop.
    async fn scan_keys(&self, pattern: &str) -> AppResult<Vec<String>> {
        let mut conn = self.client.conn_mut();
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, page): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(self.batch_size)
                .query_async(&mut conn)
                .await
                .map_err(Self::map_err)?;

            keys.extend(page);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once.
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: Option<String> = conn.get(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .set_ex(&full_key, value, ttl.as_secs().max(1))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let removed: u64 = conn.del(&full_key).await.map_err(Self::map_err)?;
        Ok(removed > 0)
    }

    async fn scan_prefix(&self, prefix: &str) -> AppResult<Vec<(String, String)>> {
        let pattern = format!("{}*", self.client.prefixed_key(prefix));
        let keys = self.scan_keys(&pattern).await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        // One round trip: a pipeline of MGETs, each bounded by the batch size.
        let chunks: Vec<&[String]> = keys.chunks(self.batch_size).collect();
        let mut pipe = redis::pipe();
        for chunk in &chunks {
            pipe.cmd("MGET").arg(*chunk);
        }

        let mut conn = self.client.conn_mut();
        let values: Vec<Vec<Option<String>>> =
            pipe.query_async(&mut conn).await.map_err(Self::map_err)?;

        let mut entries = Vec::with_capacity(keys.len());
        for (chunk, chunk_values) in chunks.iter().zip(values) {
            for (full_key, value) in chunk.iter().zip(chunk_values) {
                // Keys that expired between SCAN and MGET come back as nil.
                if let Some(value) = value {
                    let key = self.client.unprefixed_key(full_key).to_string();
                    entries.push((key, value));
                }
            }
        }

        debug!(prefix, count = entries.len(), "Scanned keys by prefix");
        Ok(entries)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let result: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(result == "PONG")
    }
}
