//! Cohort repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_entity::cohort::Cohort;

use crate::store::CohortStore;

/// PostgreSQL-backed cohort store.
#[derive(Debug, Clone)]
pub struct CohortRepository {
    pool: PgPool,
}

impl CohortRepository {
    /// Create a new cohort repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CohortStore for CohortRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Cohort>> {
        let row: Option<(Uuid, String)> =
            sqlx::query_as("SELECT id, name FROM cohorts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to find cohort", e)
                })?;

        let Some((id, name)) = row else {
            return Ok(None);
        };

        let member_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM cohort_members WHERE cohort_id = $1 ORDER BY user_id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list cohort members", e)
        })?;

        Ok(Some(Cohort {
            id,
            name,
            member_ids,
        }))
    }
}
