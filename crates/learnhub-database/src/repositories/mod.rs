//! PostgreSQL repository implementations.

pub mod cohort;
pub mod user;

pub use cohort::CohortRepository;
pub use user::UserRepository;
