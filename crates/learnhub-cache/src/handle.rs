//! Process-wide, lazily connected cache handle.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use learnhub_core::config::cache::CacheConfig;
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_core::traits::clock::Clock;

use crate::provider::CacheManager;

#[derive(Debug)]
enum HandleState {
    Disconnected,
    Connected(CacheManager),
    Closed,
}

/// Connect-once handle to the configured cache backend.
///
/// The first call to [`CacheHandle::get`] connects; later calls reuse the
/// same manager. A failed connect leaves the handle disconnected so the next
/// caller retries. After [`CacheHandle::close`] every call fails.
#[derive(Debug)]
pub struct CacheHandle {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    scan_batch_size: usize,
    state: RwLock<HandleState>,
}

impl CacheHandle {
    /// Create a disconnected handle. No I/O happens until first use.
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>, scan_batch_size: usize) -> Self {
        Self {
            config,
            clock,
            scan_batch_size,
            state: RwLock::new(HandleState::Disconnected),
        }
    }

    /// Create a handle that is already connected to `manager`.
    pub fn from_manager(manager: CacheManager, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: CacheConfig::default(),
            clock,
            scan_batch_size: 1,
            state: RwLock::new(HandleState::Connected(manager)),
        }
    }

    /// Return the connected manager, connecting on first use.
    pub async fn get(&self) -> AppResult<CacheManager> {
        {
            let state = self.state.read().await;
            match &*state {
                HandleState::Connected(manager) => return Ok(manager.clone()),
                HandleState::Closed => return Err(closed()),
                HandleState::Disconnected => {}
            }
        }

        let mut state = self.state.write().await;
        match &*state {
            HandleState::Connected(manager) => Ok(manager.clone()),
            HandleState::Closed => Err(closed()),
            HandleState::Disconnected => {
                let manager =
                    CacheManager::new(&self.config, self.clock.clone(), self.scan_batch_size)
                        .await
                        .inspect_err(|e| warn!(error = %e, "Cache connection failed"))?;
                *state = HandleState::Connected(manager.clone());
                Ok(manager)
            }
        }
    }

    /// Whether a connection has been established and not closed.
    pub async fn is_connected(&self) -> bool {
        matches!(&*self.state.read().await, HandleState::Connected(_))
    }

    /// Drop the connection. Subsequent calls to [`CacheHandle::get`] fail.
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        if matches!(&*state, HandleState::Connected(_)) {
            info!("Closing cache connection");
        }
        *state = HandleState::Closed;
    }
}

fn closed() -> AppError {
    AppError::cache("Cache handle has been closed")
}
