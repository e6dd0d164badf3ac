//! Cohort (course roster) entities.

pub mod model;

pub use model::Cohort;
