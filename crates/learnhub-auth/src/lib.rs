//! # learnhub-auth
//!
//! Bearer-token authentication for the LearnHub API.
//!
//! The identity provider is external; this crate only verifies the HS256
//! access tokens it issues and can mint equivalent tokens for local
//! development and tests.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
