//! # learnhub-entity
//!
//! Domain entity models for LearnHub. Durable entities (user profiles and
//! cohorts) derive `sqlx::FromRow`; presence types are value objects that
//! live only in the ephemeral presence store or are computed per request.

pub mod cohort;
pub mod presence;
pub mod user;
