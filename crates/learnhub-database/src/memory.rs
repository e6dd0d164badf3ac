//! In-memory profile and cohort stores.
//!
//! Used for local development and tests. Optionally seeded from a JSON
//! file of the form `{ "profiles": [...], "cohorts": [...] }`.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_entity::cohort::Cohort;
use learnhub_entity::user::UserProfile;
use learnhub_entity::user::model::PresenceMirror;

use crate::store::{CohortStore, ProfileStore};

/// Profile store held in a concurrent map.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    /// User ID → profile
    profiles: Arc<DashMap<Uuid, UserProfile>>,
    /// External ID → user ID
    by_external: Arc<DashMap<String, Uuid>>,
}

impl MemoryProfileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile.
    pub fn insert(&self, profile: UserProfile) {
        self.by_external
            .insert(profile.external_id.clone(), profile.id);
        self.profiles.insert(profile.id, profile);
    }

    /// Number of stored profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<UserProfile>> {
        let Some(id) = self.by_external.get(external_id).map(|r| *r.value()) else {
            return Ok(None);
        };
        Ok(self.profiles.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.get(&id).map(|r| r.value().clone()))
    }

    async fn update_presence(&self, user_id: Uuid, mirror: PresenceMirror) -> AppResult<bool> {
        match self.profiles.get_mut(&user_id) {
            Some(mut entry) if mirror.supersedes(entry.last_active) => {
                entry.last_active = Some(mirror.last_active);
                entry.is_online = mirror.is_online;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Cohort store held in a concurrent map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCohortStore {
    cohorts: Arc<DashMap<Uuid, Cohort>>,
}

impl MemoryCohortStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cohort.
    pub fn insert(&self, cohort: Cohort) {
        self.cohorts.insert(cohort.id, cohort);
    }
}

#[async_trait]
impl CohortStore for MemoryCohortStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Cohort>> {
        Ok(self.cohorts.get(&id).map(|r| r.value().clone()))
    }
}

/// Seed data for the in-memory backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    /// Profiles to insert.
    #[serde(default)]
    pub profiles: Vec<UserProfile>,
    /// Cohorts to insert.
    #[serde(default)]
    pub cohorts: Vec<Cohort>,
}

impl SeedData {
    /// Read seed data from a JSON file.
    pub async fn load(path: &str) -> AppResult<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to read seed file '{path}'"),
                e,
            )
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Insert everything into the given stores.
    pub fn apply(self, profiles: &MemoryProfileStore, cohorts: &MemoryCohortStore) {
        for profile in self.profiles {
            profiles.insert(profile);
        }
        for cohort in self.cohorts {
            cohorts.insert(cohort);
        }
    }
}
