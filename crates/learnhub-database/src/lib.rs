//! # learnhub-database
//!
//! Durable collaborators consumed by presence tracking: the user profile
//! store and the cohort store. Each is a trait with a PostgreSQL
//! implementation and an in-memory implementation selected by
//! `database.provider`.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{CohortStore, ProfileStore, Stores};
