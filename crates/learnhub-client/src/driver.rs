//! Heartbeat scheduling state machine.
//!
//! The driver holds no timers and performs no I/O. Each event is fed in with
//! the instant it happened and the driver answers with the [`Signal`], if any,
//! that the session must emit.

use std::time::Duration;

use tokio::time::Instant;

use learnhub_core::config::ClientConfig;

/// Scheduling state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Recently interacted with; heartbeats are sent on every tick.
    Active,
    /// No interaction within the idle window; heartbeats are suppressed.
    Idle,
    /// The page is not visible; the timer is suspended.
    Hidden,
    /// The session has been torn down.
    Stopped,
}

/// What the session must send in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Refresh the presence record (`POST /heartbeat`).
    Heartbeat,
    /// Mark the user offline and wait for the answer (`DELETE /heartbeat`).
    Offline,
    /// Mark the user offline without waiting; must outlive the session.
    OfflineBeacon,
}

/// Per-session heartbeat state machine.
#[derive(Debug, Clone)]
pub struct HeartbeatDriver {
    state: DriverState,
    last_interaction: Instant,
    idle_timeout: Duration,
}

impl HeartbeatDriver {
    /// Start an active session at `now`.
    pub fn new(idle_timeout: Duration, now: Instant) -> Self {
        Self {
            state: DriverState::Active,
            last_interaction: now,
            idle_timeout,
        }
    }

    /// Start an active session using the configured idle window.
    pub fn from_config(config: &ClientConfig, now: Instant) -> Self {
        Self::new(config.idle_timeout(), now)
    }

    /// Current state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Signal for the moment the session starts.
    pub fn on_start(&self) -> Option<Signal> {
        (self.state == DriverState::Active).then_some(Signal::Heartbeat)
    }

    /// Periodic tick.
    ///
    /// An active session whose last interaction is older than the idle window
    /// goes idle silently; the server lets its record age out.
    pub fn on_tick(&mut self, now: Instant) -> Option<Signal> {
        if self.state != DriverState::Active {
            return None;
        }

        if now.saturating_duration_since(self.last_interaction) >= self.idle_timeout {
            self.state = DriverState::Idle;
            return None;
        }

        Some(Signal::Heartbeat)
    }

    /// Pointer, key, scroll or touch activity.
    ///
    /// Waking an idle session signals right away instead of waiting a tick.
    pub fn on_interaction(&mut self, now: Instant) -> Option<Signal> {
        self.last_interaction = now;
        match self.state {
            DriverState::Idle => {
                self.state = DriverState::Active;
                Some(Signal::Heartbeat)
            }
            _ => None,
        }
    }

    /// The page was hidden.
    pub fn on_hidden(&mut self) -> Option<Signal> {
        match self.state {
            DriverState::Hidden | DriverState::Stopped => None,
            _ => {
                self.state = DriverState::Hidden;
                Some(Signal::Offline)
            }
        }
    }

    /// The page became visible again.
    pub fn on_visible(&mut self, now: Instant) -> Option<Signal> {
        if self.state != DriverState::Hidden {
            return None;
        }
        self.state = DriverState::Active;
        self.last_interaction = now;
        Some(Signal::Heartbeat)
    }

    /// The session is being torn down.
    pub fn on_teardown(&mut self) -> Option<Signal> {
        if self.state == DriverState::Stopped {
            return None;
        }
        self.state = DriverState::Stopped;
        Some(Signal::OfflineBeacon)
    }
}
