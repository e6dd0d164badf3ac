//! User profile repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_entity::user::UserProfile;
use learnhub_entity::user::model::PresenceMirror;

use crate::store::ProfileStore;

/// PostgreSQL-backed profile store.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for UserRepository {
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM users WHERE external_id = $1")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by external id", e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn update_presence(&self, user_id: Uuid, mirror: PresenceMirror) -> AppResult<bool> {
        // Field-level update: other subsystems write the same row concurrently.
        // Writes older than the stored value are dropped; offline wins ties.
        let result = sqlx::query(
            "UPDATE users SET last_active = $2, is_online = $3 \
             WHERE id = $1 \
               AND (last_active IS NULL OR last_active < $2 OR (last_active = $2 AND NOT $3))",
        )
        .bind(user_id)
        .bind(mirror.last_active)
        .bind(mirror.is_online)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update user presence", e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
