//! Collaborator traits for durable profile and cohort data.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use learnhub_core::config::DatabaseConfig;
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_entity::cohort::Cohort;
use learnhub_entity::user::UserProfile;
use learnhub_entity::user::model::PresenceMirror;

use crate::connection::DatabasePool;
use crate::memory::{MemoryCohortStore, MemoryProfileStore, SeedData};
use crate::repositories::{CohortRepository, UserRepository};

/// Read access to user profiles plus the presence mirror fields.
#[async_trait]
pub trait ProfileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a profile by identity-provider subject.
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<UserProfile>>;

    /// Find a profile by user ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>>;

    /// Write only `last_active` and `is_online`. Returns `false` if the
    /// user does not exist or already holds a newer `last_active`.
    async fn update_presence(&self, user_id: Uuid, mirror: PresenceMirror) -> AppResult<bool>;
}

/// Read access to cohort membership.
#[async_trait]
pub trait CohortStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a cohort with its member list.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Cohort>>;
}

/// The durable collaborators, selected by configuration.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Profile store.
    pub profiles: Arc<dyn ProfileStore>,
    /// Cohort store.
    pub cohorts: Arc<dyn CohortStore>,
    /// Pool handle when backed by PostgreSQL.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Open the configured backend.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    crate::migration::run_migrations(pool.pool()).await?;
                }
                Ok(Self {
                    profiles: Arc::new(UserRepository::new(pool.pool().clone())),
                    cohorts: Arc::new(CohortRepository::new(pool.pool().clone())),
                    pool: Some(pool),
                })
            }
            "memory" => {
                let profiles = MemoryProfileStore::new();
                let cohorts = MemoryCohortStore::new();
                if let Some(path) = &config.seed_file {
                    let seed = SeedData::load(path).await?;
                    info!(
                        path = %path,
                        profiles = seed.profiles.len(),
                        cohorts = seed.cohorts.len(),
                        "Seeding in-memory stores"
                    );
                    seed.apply(&profiles, &cohorts);
                }
                Ok(Self::in_memory(profiles, cohorts))
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// Wrap already-built in-memory stores.
    pub fn in_memory(profiles: MemoryProfileStore, cohorts: MemoryCohortStore) -> Self {
        Self {
            profiles: Arc::new(profiles),
            cohorts: Arc::new(cohorts),
            pool: None,
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
