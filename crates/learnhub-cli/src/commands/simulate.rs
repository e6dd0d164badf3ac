//! Scripted heartbeat session against a running server.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio::sync::mpsc;
use tokio::time;

use crate::output;
use learnhub_auth::JwtEncoder;
use learnhub_client::{HttpTransport, SessionEvent, run_session};
use learnhub_core::config::AppConfig;
use learnhub_core::error::AppError;
use learnhub_entity::user::UserRole;

/// Arguments for the simulate command
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Subject to mint a token for; ignored when --token is given
    #[arg(short, long, default_value = "auth0|student-1")]
    pub subject: String,

    /// Role claim for the minted token
    #[arg(short, long, default_value = "student")]
    pub role: UserRole,

    /// Use this bearer token instead of minting one
    #[arg(long)]
    pub token: Option<String>,

    /// Override the API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Seconds the user keeps interacting
    #[arg(long, default_value_t = 30)]
    pub active_for: u64,

    /// Hide the page at this many seconds and show it again 10 s later
    #[arg(long)]
    pub hide_at: Option<u64>,

    /// Total session length in seconds
    #[arg(short, long, default_value_t = 60)]
    pub duration: u64,
}

/// Execute the simulate command
pub async fn execute(args: &SimulateArgs, config: &AppConfig) -> Result<(), AppError> {
    let mut client_config = config.client.clone();
    if let Some(base_url) = &args.base_url {
        client_config.base_url = base_url.clone();
    }

    let token = match &args.token {
        Some(token) => token.clone(),
        None => {
            JwtEncoder::new(&config.auth)
                .issue_access_token(&args.subject, args.role, &args.subject)?
                .0
        }
    };

    let transport = Arc::new(HttpTransport::new(&client_config, token)?);
    let (tx, rx) = mpsc::channel(16);

    println!("Simulating session against {}", transport.heartbeat_url());
    output::print_kv("Active for", &format!("{}s", args.active_for));
    output::print_kv("Duration", &format!("{}s", args.duration));

    let session = tokio::spawn({
        let transport = Arc::clone(&transport);
        let client_config = client_config.clone();
        async move { run_session(transport, &client_config, rx).await }
    });

    for second in 0..args.duration {
        time::sleep(Duration::from_secs(1)).await;
        let event = if Some(second) == args.hide_at {
            Some(SessionEvent::Hidden)
        } else if args.hide_at.is_some_and(|h| second == h + 10) {
            Some(SessionEvent::Visible)
        } else if second < args.active_for {
            Some(SessionEvent::Interaction)
        } else {
            None
        };

        if let Some(event) = event {
            if tx.send(event).await.is_err() {
                break;
            }
        }
    }
    let _ = tx.send(SessionEvent::Teardown).await;

    let report = session
        .await
        .map_err(|e| AppError::internal(format!("Session task failed: {e}")))?;

    if let Some(beacon) = report.beacon {
        if time::timeout(client_config.request_timeout(), beacon)
            .await
            .is_err()
        {
            output::print_warning("Offline beacon did not finish before exit");
        }
    }

    output::print_success("Session finished");
    output::print_kv("Heartbeats", &report.heartbeats_sent.to_string());
    output::print_kv("Offline signals", &report.offline_sent.to_string());
    output::print_kv("Failures", &report.failures.to_string());
    if let Some(ts) = report.last_server_timestamp {
        output::print_kv("Last server time", &ts.to_string());
    }
    if let Some(skew) = transport.clock_skew_ms().await {
        output::print_kv("Clock skew", &format!("{skew} ms"));
    }
    Ok(())
}
