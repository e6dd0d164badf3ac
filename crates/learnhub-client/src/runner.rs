//! Timer loop driving one session's heartbeats.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use learnhub_core::config::ClientConfig;

use crate::driver::{HeartbeatDriver, Signal};
use crate::transport::HeartbeatTransport;

/// Something that happened to the session outside the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Pointer, key, scroll or touch activity.
    Interaction,
    /// The page was hidden.
    Hidden,
    /// The page became visible.
    Visible,
    /// The session is ending.
    Teardown,
}

/// What a finished session sent.
#[derive(Debug, Default)]
pub struct SessionReport {
    /// Heartbeats acknowledged by the server.
    pub heartbeats_sent: u64,
    /// Offline signals acknowledged by the server.
    pub offline_sent: u64,
    /// Signals that failed.
    pub failures: u64,
    /// Server timestamp from the last acknowledged heartbeat.
    pub last_server_timestamp: Option<i64>,
    /// The detached offline beacon fired on teardown.
    pub beacon: Option<JoinHandle<()>>,
}

/// Run a session until [`SessionEvent::Teardown`] arrives or every event
/// sender is dropped.
///
/// Ticks and events are handled on this one task and every send is awaited
/// before the next one starts, so a slow request delays the timer instead of
/// overlapping with it. Ticks missed meanwhile are skipped.
pub async fn run_session<T>(
    transport: Arc<T>,
    config: &ClientConfig,
    mut events: mpsc::Receiver<SessionEvent>,
) -> SessionReport
where
    T: HeartbeatTransport + ?Sized,
{
    let period = config.heartbeat_interval();
    let start = Instant::now();
    let mut driver = HeartbeatDriver::from_config(config, start);
    let mut report = SessionReport::default();

    let mut ticker = time::interval_at(start + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        interval_secs = period.as_secs(),
        idle_secs = config.idle_timeout_seconds,
        "Heartbeat session started"
    );

    if let Some(signal) = driver.on_start() {
        dispatch(transport.as_ref(), signal, &mut report).await;
    }

    loop {
        let signal = tokio::select! {
            _ = ticker.tick() => driver.on_tick(Instant::now()),
            event = events.recv() => {
                let now = Instant::now();
                match event {
                    Some(SessionEvent::Interaction) => driver.on_interaction(now),
                    Some(SessionEvent::Hidden) => driver.on_hidden(),
                    Some(SessionEvent::Visible) => {
                        let signal = driver.on_visible(now);
                        if signal.is_some() {
                            ticker.reset();
                        }
                        signal
                    }
                    Some(SessionEvent::Teardown) | None => driver.on_teardown(),
                }
            }
        };

        if let Some(signal) = signal {
            let teardown = signal == Signal::OfflineBeacon;
            dispatch(transport.as_ref(), signal, &mut report).await;
            if teardown {
                break;
            }
        }
    }

    info!(
        heartbeats = report.heartbeats_sent,
        offline = report.offline_sent,
        failures = report.failures,
        "Heartbeat session stopped"
    );
    report
}

async fn dispatch<T>(transport: &T, signal: Signal, report: &mut SessionReport)
where
    T: HeartbeatTransport + ?Sized,
{
    match signal {
        Signal::Heartbeat => match transport.send_heartbeat().await {
            Ok(ack) => {
                report.heartbeats_sent += 1;
                report.last_server_timestamp = Some(ack.timestamp);
            }
            Err(e) => {
                report.failures += 1;
                warn!(error = %e, "Heartbeat failed");
            }
        },
        Signal::Offline => match transport.send_offline().await {
            Ok(()) => report.offline_sent += 1,
            Err(e) => {
                report.failures += 1;
                warn!(error = %e, "Offline signal failed");
            }
        },
        Signal::OfflineBeacon => {
            debug!("Firing offline beacon");
            report.beacon = Some(transport.offline_beacon());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use learnhub_core::error::AppError;
    use learnhub_core::result::AppResult;

    use super::*;
    use crate::transport::HeartbeatAck;

    #[derive(Debug, Default)]
    struct RecordingTransport {
        calls: Arc<Mutex<Vec<&'static str>>>,
        fail_heartbeats: bool,
    }

    impl RecordingTransport {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HeartbeatTransport for RecordingTransport {
        async fn send_heartbeat(&self) -> AppResult<HeartbeatAck> {
            self.calls.lock().unwrap().push("heartbeat");
            if self.fail_heartbeats {
                return Err(AppError::external_service("connection refused"));
            }
            Ok(HeartbeatAck {
                success: true,
                timestamp: 42,
            })
        }

        async fn send_offline(&self) -> AppResult<()> {
            self.calls.lock().unwrap().push("offline");
            Ok(())
        }

        fn offline_beacon(&self) -> JoinHandle<()> {
            let calls = self.calls.clone();
            tokio::spawn(async move {
                calls.lock().unwrap().push("beacon");
            })
        }
    }

    fn config(idle_secs: u64) -> ClientConfig {
        ClientConfig {
            heartbeat_interval_seconds: 5,
            idle_timeout_seconds: idle_secs,
            ..ClientConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_beats_on_start_and_each_tick() {
        let transport = Arc::new(RecordingTransport::default());
        let (tx, rx) = mpsc::channel(8);
        let cfg = config(120);
        let session = tokio::spawn({
            let transport = transport.clone();
            async move { run_session(transport, &cfg, rx).await }
        });

        time::sleep(Duration::from_secs(12)).await;
        tx.send(SessionEvent::Teardown).await.unwrap();
        let report = session.await.unwrap();
        report.beacon.unwrap().await.unwrap();

        assert_eq!(report.heartbeats_sent, 3);
        assert_eq!(report.last_server_timestamp, Some(42));
        assert_eq!(
            transport.calls(),
            vec!["heartbeat", "heartbeat", "heartbeat", "beacon"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_suppresses_until_interaction() {
        let transport = Arc::new(RecordingTransport::default());
        let (tx, rx) = mpsc::channel(8);
        let cfg = config(12);
        let session = tokio::spawn({
            let transport = transport.clone();
            async move { run_session(transport, &cfg, rx).await }
        });

        time::sleep(Duration::from_secs(41)).await;
        assert_eq!(transport.calls().len(), 3);

        tx.send(SessionEvent::Interaction).await.unwrap();
        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(transport.calls().len(), 4);

        drop(tx);
        let report = session.await.unwrap();
        report.beacon.unwrap().await.unwrap();
        assert_eq!(report.heartbeats_sent, 4);
        assert_eq!(transport.calls().last(), Some(&"beacon"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hidden_signals_offline_and_visible_resumes() {
        let transport = Arc::new(RecordingTransport::default());
        let (tx, rx) = mpsc::channel(8);
        let cfg = config(120);
        let session = tokio::spawn({
            let transport = transport.clone();
            async move { run_session(transport, &cfg, rx).await }
        });

        time::sleep(Duration::from_secs(1)).await;
        tx.send(SessionEvent::Hidden).await.unwrap();
        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(transport.calls(), vec!["heartbeat", "offline"]);

        tx.send(SessionEvent::Visible).await.unwrap();
        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(transport.calls(), vec!["heartbeat", "offline", "heartbeat"]);

        tx.send(SessionEvent::Teardown).await.unwrap();
        let report = session.await.unwrap();
        assert_eq!(report.offline_sent, 1);
        assert_eq!(report.heartbeats_sent, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_heartbeats_are_counted_and_loop_continues() {
        let transport = Arc::new(RecordingTransport {
            fail_heartbeats: true,
            ..RecordingTransport::default()
        });
        let (tx, rx) = mpsc::channel(8);
        let cfg = config(120);
        let session = tokio::spawn({
            let transport = transport.clone();
            async move { run_session(transport, &cfg, rx).await }
        });

        time::sleep(Duration::from_secs(11)).await;
        tx.send(SessionEvent::Teardown).await.unwrap();
        let report = session.await.unwrap();

        assert_eq!(report.heartbeats_sent, 0);
        assert_eq!(report.failures, 3);
        assert_eq!(report.last_server_timestamp, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_runs_at_one_second() {
        let transport = Arc::new(RecordingTransport::default());
        let (tx, rx) = mpsc::channel(8);
        let cfg = ClientConfig {
            heartbeat_interval_seconds: 0,
            ..ClientConfig::default()
        };
        let session = tokio::spawn({
            let transport = transport.clone();
            async move { run_session(transport, &cfg, rx).await }
        });

        time::sleep(Duration::from_millis(2_500)).await;
        tx.send(SessionEvent::Teardown).await.unwrap();
        let report = session.await.unwrap();

        assert_eq!(report.heartbeats_sent, 3);
    }
}
