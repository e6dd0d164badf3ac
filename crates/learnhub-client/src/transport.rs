//! Delivery of heartbeat signals to the LearnHub API.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use learnhub_core::config::ClientConfig;
use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;

/// Body of a successful `POST /heartbeat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HeartbeatAck {
    /// Always `true` on success.
    pub success: bool,
    /// Server time the heartbeat was stamped with, epoch milliseconds.
    pub timestamp: i64,
}

/// Sends heartbeat signals on behalf of a session.
#[async_trait]
pub trait HeartbeatTransport: Send + Sync + 'static {
    /// Refresh the caller's presence record.
    async fn send_heartbeat(&self) -> AppResult<HeartbeatAck>;

    /// Mark the caller offline and wait for the answer.
    async fn send_offline(&self) -> AppResult<()>;

    /// Mark the caller offline without waiting.
    ///
    /// The request runs on a detached task so it completes even when the
    /// session that issued it has already stopped.
    fn offline_beacon(&self) -> JoinHandle<()>;
}

/// `reqwest`-backed transport authenticating with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    heartbeat_url: String,
    token: String,
    clock_skew_ms: Arc<RwLock<Option<i64>>>,
}

impl HttpTransport {
    /// Build a transport for `config.base_url` using `token`.
    pub fn new(config: &ClientConfig, token: impl Into<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            client,
            heartbeat_url: heartbeat_url(&config.base_url),
            token: token.into(),
            clock_skew_ms: Arc::new(RwLock::new(None)),
        })
    }

    /// Endpoint this transport talks to.
    pub fn heartbeat_url(&self) -> &str {
        &self.heartbeat_url
    }

    /// Server clock minus local clock, in milliseconds, as observed on the
    /// last acknowledged heartbeat.
    pub async fn clock_skew_ms(&self) -> Option<i64> {
        *self.clock_skew_ms.read().await
    }
}

#[async_trait]
impl HeartbeatTransport for HttpTransport {
    async fn send_heartbeat(&self) -> AppResult<HeartbeatAck> {
        let sent_at = Utc::now().timestamp_millis();
        let response = self
            .client
            .post(&self.heartbeat_url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(request_error)?;

        check_status(response.status())?;

        let ack: HeartbeatAck = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Malformed heartbeat acknowledgement: {e}"),
                e,
            )
        })?;

        let received_at = Utc::now().timestamp_millis();
        let midpoint = sent_at + (received_at - sent_at) / 2;
        let skew = ack.timestamp - midpoint;
        *self.clock_skew_ms.write().await = Some(skew);
        debug!(server_timestamp = ack.timestamp, skew_ms = skew, "Heartbeat acknowledged");

        Ok(ack)
    }

    async fn send_offline(&self) -> AppResult<()> {
        let response = self
            .client
            .delete(&self.heartbeat_url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(request_error)?;

        check_status(response.status())?;
        debug!("Offline signal acknowledged");
        Ok(())
    }

    fn offline_beacon(&self) -> JoinHandle<()> {
        let transport = self.clone();
        tokio::spawn(async move {
            if let Err(e) = transport.send_offline().await {
                warn!(error = %e, "Offline beacon failed");
            }
        })
    }
}

fn heartbeat_url(base_url: &str) -> String {
    format!("{}/heartbeat", base_url.trim_end_matches('/'))
}

fn request_error(err: reqwest::Error) -> AppError {
    let message = if err.is_timeout() {
        "Heartbeat request timed out".to_string()
    } else {
        format!("Heartbeat request failed: {err}")
    };
    AppError::with_source(ErrorKind::ExternalService, message, err)
}

fn check_status(status: StatusCode) -> AppResult<()> {
    if status.is_success() {
        return Ok(());
    }
    Err(match status {
        StatusCode::UNAUTHORIZED => AppError::authentication("Session token was rejected"),
        StatusCode::FORBIDDEN => AppError::authorization("Session is not allowed to signal"),
        StatusCode::NOT_FOUND => AppError::not_found("No profile exists for this session"),
        other => AppError::external_service(format!("Heartbeat endpoint answered {other}")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heartbeat_url_joins_base() {
        assert_eq!(
            heartbeat_url("http://localhost:8080/api"),
            "http://localhost:8080/api/heartbeat"
        );
        assert_eq!(
            heartbeat_url("http://localhost:8080/api/"),
            "http://localhost:8080/api/heartbeat"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert_eq!(
            check_status(StatusCode::UNAUTHORIZED).unwrap_err().kind,
            ErrorKind::Authentication
        );
        assert_eq!(
            check_status(StatusCode::NOT_FOUND).unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert_eq!(
            check_status(StatusCode::INTERNAL_SERVER_ERROR).unwrap_err().kind,
            ErrorKind::ExternalService
        );
    }

    #[tokio::test]
    async fn test_new_transport_has_no_skew() {
        let transport = HttpTransport::new(&ClientConfig::default(), "token").unwrap();
        assert_eq!(transport.heartbeat_url(), "http://localhost:8080/api/heartbeat");
        assert_eq!(transport.clock_skew_ms().await, None);
    }

    #[test]
    fn test_ack_deserializes() {
        let ack: HeartbeatAck =
            serde_json::from_str(r#"{"success":true,"timestamp":1760000000000}"#).unwrap();
        assert!(ack.success);
        assert_eq!(ack.timestamp, 1_760_000_000_000);
    }
}
