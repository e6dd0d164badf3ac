//! Heartbeat ingest.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use learnhub_cache::PresenceStore;
use learnhub_core::config::PresenceConfig;
use learnhub_core::error::AppError;
use learnhub_core::traits::clock::Clock;
use learnhub_database::ProfileStore;
use learnhub_entity::presence::HeartbeatRecord;
use learnhub_entity::user::UserProfile;
use learnhub_entity::user::model::PresenceMirror;

use crate::context::RequestContext;

/// Acknowledgement returned for an accepted heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatAck {
    /// The user the heartbeat was recorded for.
    pub user_id: Uuid,
    /// Server time the heartbeat was stamped with, epoch milliseconds.
    pub timestamp: i64,
}

/// Records and clears heartbeats.
///
/// Each call writes the presence store and, independently, the durable
/// profile mirror. The mirror runs on a detached task so a slow database
/// never delays the acknowledgement.
#[derive(Debug, Clone)]
pub struct HeartbeatService {
    profiles: Arc<dyn ProfileStore>,
    store: PresenceStore,
    clock: Arc<dyn Clock>,
    record_ttl: Duration,
    mirror_interval_ms: i64,
    mirror_timeout: Duration,
}

impl HeartbeatService {
    /// Creates a new heartbeat service.
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        store: PresenceStore,
        clock: Arc<dyn Clock>,
        config: &PresenceConfig,
    ) -> Self {
        let mirror_interval_ms = i64::try_from(config.mirror_interval_seconds)
            .unwrap_or(i64::MAX / 1_000)
            .saturating_mul(1_000);
        Self {
            profiles,
            store,
            clock,
            record_ttl: config.record_ttl(),
            mirror_interval_ms,
            mirror_timeout: config.mirror_timeout(),
        }
    }

    /// Mark the caller as active now.
    ///
    /// Fails with not-found if the caller has no profile, and with a cache
    /// error if the presence store rejected the write.
    pub async fn record_heartbeat(&self, ctx: &RequestContext) -> Result<HeartbeatAck, AppError> {
        let profile = self.resolve(ctx).await?;
        let now_ms = self.clock.now_ms();

        let record = HeartbeatRecord::from_profile(&profile, now_ms);
        let stored = self.store.put(profile.id, &record, self.record_ttl).await;

        if self.mirror_due(&profile, now_ms) {
            self.spawn_mirror(
                profile.id,
                PresenceMirror {
                    last_active: self.clock.now(),
                    is_online: true,
                },
            );
        }

        if !stored {
            return Err(AppError::cache("Presence store is unavailable"));
        }

        debug!(user_id = %profile.id, "Heartbeat recorded");
        Ok(HeartbeatAck {
            user_id: profile.id,
            timestamp: now_ms,
        })
    }

    /// Mark the caller offline immediately. Safe to repeat.
    pub async fn clear_heartbeat(&self, ctx: &RequestContext) -> Result<HeartbeatAck, AppError> {
        let profile = self.resolve(ctx).await?;
        let now_ms = self.clock.now_ms();

        let removed = self.store.remove(profile.id).await;
        self.spawn_mirror(
            profile.id,
            PresenceMirror {
                last_active: self.clock.now(),
                is_online: false,
            },
        );

        if !removed {
            return Err(AppError::cache("Presence store is unavailable"));
        }

        info!(user_id = %profile.id, "Heartbeat cleared");
        Ok(HeartbeatAck {
            user_id: profile.id,
            timestamp: now_ms,
        })
    }

    async fn resolve(&self, ctx: &RequestContext) -> Result<UserProfile, AppError> {
        self.profiles
            .find_by_external_id(&ctx.subject)
            .await?
            .ok_or_else(|| AppError::not_found("User profile not found"))
    }

    /// The durable mirror is refreshed when the profile does not yet show
    /// the user online or its `last_active` is older than the mirror interval.
    fn mirror_due(&self, profile: &UserProfile, now_ms: i64) -> bool {
        if !profile.is_online {
            return true;
        }
        match profile.last_active {
            Some(last) => now_ms - last.timestamp_millis() >= self.mirror_interval_ms,
            None => true,
        }
    }

    fn spawn_mirror(&self, user_id: Uuid, mirror: PresenceMirror) {
        let profiles = self.profiles.clone();
        let timeout = self.mirror_timeout;

        tokio::spawn(async move {
            let write = profiles.update_presence(user_id, mirror);
            match tokio::time::timeout(timeout, write).await {
                Ok(Ok(true)) => {
                    debug!(user_id = %user_id, is_online = mirror.is_online, "Presence mirrored");
                }
                Ok(Ok(false)) => {
                    debug!(user_id = %user_id, "Presence mirror skipped: no profile or newer value");
                }
                Ok(Err(e)) => {
                    warn!(user_id = %user_id, error = %e, "Presence mirror write failed");
                }
                Err(_) => {
                    warn!(
                        user_id = %user_id,
                        timeout_ms = timeout.as_millis() as u64,
                        "Presence mirror write timed out"
                    );
                }
            }
        });
    }
}
