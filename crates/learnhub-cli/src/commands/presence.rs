//! Presence inspection commands.

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use learnhub_core::config::AppConfig;
use learnhub_core::error::AppError;
use learnhub_entity::presence::PresenceStatus;
use learnhub_service::presence::{PresenceCounts, PresenceEntry};

use super::QueryContext;

/// Arguments for presence commands
#[derive(Debug, Args)]
pub struct PresenceArgs {
    /// Presence subcommand
    #[command(subcommand)]
    pub command: PresenceCommand,
}

/// Presence subcommands
#[derive(Debug, Subcommand)]
pub enum PresenceCommand {
    /// List every user with a live presence record
    List {
        /// Only show users with this status
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Show a cohort roster with member presence
    Cohort {
        /// Cohort ID
        cohort_id: Uuid,
    },
}

/// Status filter accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Heartbeat within the online threshold
    Online,
    /// Heartbeat within the away threshold
    Away,
    /// Older than the away threshold
    Offline,
}

impl From<StatusArg> for PresenceStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Online => Self::Online,
            StatusArg::Away => Self::Away,
            StatusArg::Offline => Self::Offline,
        }
    }
}

/// Presence display row for table output
#[derive(Debug, Serialize, Tabled)]
struct PresenceRow {
    /// User ID
    user_id: String,
    /// Name
    name: String,
    /// Role
    role: String,
    /// Status
    status: String,
    /// Last seen
    last_seen: String,
}

impl From<&PresenceEntry> for PresenceRow {
    fn from(entry: &PresenceEntry) -> Self {
        Self {
            user_id: entry.user_id.to_string(),
            name: entry.name.clone().unwrap_or_else(|| "-".to_string()),
            role: entry
                .role
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
            status: entry.status.as_str().to_string(),
            last_seen: entry.last_seen_relative.clone(),
        }
    }
}

/// Execute presence commands
pub async fn execute(
    args: &PresenceArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = QueryContext::open(config).await?;
    if !ctx.store_connected().await {
        output::print_warning("Presence store unavailable; every user reads as offline");
    }

    let result = run(args, &ctx, format).await;
    ctx.close().await;
    result
}

async fn run(args: &PresenceArgs, ctx: &QueryContext, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        PresenceCommand::List { status } => {
            let view = ctx
                .service
                .active_users_view(status.map(PresenceStatus::from))
                .await;
            let rows: Vec<PresenceRow> = view.users.iter().map(PresenceRow::from).collect();
            output::print_rows(&rows, &view, format);
            if format == OutputFormat::Table {
                print_counts(&view.counts);
            }
        }
        PresenceCommand::Cohort { cohort_id } => {
            let view = ctx.service.cohort_view(*cohort_id).await?;
            if format == OutputFormat::Table {
                println!("{} ({})", view.cohort_name, view.cohort_id);
            }
            let rows: Vec<PresenceRow> = view.members.iter().map(PresenceRow::from).collect();
            output::print_rows(&rows, &view, format);
            if format == OutputFormat::Table {
                print_counts(&view.counts);
            }
        }
    }
    Ok(())
}

fn print_counts(counts: &PresenceCounts) {
    output::print_kv("Total", &counts.total.to_string());
    output::print_kv("Online", &counts.online_count.to_string());
    output::print_kv("Away", &counts.away_count.to_string());
    output::print_kv("Offline", &counts.offline_count.to_string());
}
