//! Core traits defined in `learnhub-core` and implemented by other crates.

pub mod cache;
pub mod clock;

pub use cache::CacheProvider;
pub use clock::{Clock, ManualClock, SystemClock};
