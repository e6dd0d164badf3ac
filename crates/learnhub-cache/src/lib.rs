//! # learnhub-cache
//!
//! The ephemeral presence store and the key-value providers behind it:
//!
//! - **memory**: In-process map with per-entry expiry driven by a [`Clock`]
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime from configuration and connected
//! lazily through a process-wide [`CacheHandle`].
//!
//! [`Clock`]: learnhub_core::traits::Clock

pub mod handle;
pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod presence;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use handle::CacheHandle;
pub use presence::PresenceStore;
pub use provider::CacheManager;
