//! # learnhub-core
//!
//! Core crate for LearnHub. Contains configuration schemas, the cache and
//! clock traits implemented by other crates, and the unified error system.
//!
//! This crate has **no** internal dependencies on other LearnHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
