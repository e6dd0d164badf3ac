//! Development token minting.

use clap::Args;
use serde::Serialize;

use crate::output::{self, OutputFormat};
use learnhub_auth::JwtEncoder;
use learnhub_core::config::AppConfig;
use learnhub_core::error::AppError;
use learnhub_entity::user::UserRole;

/// Arguments for the token command
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Identity-provider subject the token is issued for
    #[arg(short, long)]
    pub subject: String,

    /// Role claim
    #[arg(short, long, default_value = "student")]
    pub role: UserRole,

    /// Display name claim (defaults to the subject)
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
struct MintedToken {
    token: String,
    expires_at: String,
}

/// Execute the token command
pub fn execute(args: &TokenArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let name = args.name.as_deref().unwrap_or(&args.subject);
    let (token, expires_at) =
        JwtEncoder::new(&config.auth).issue_access_token(&args.subject, args.role, name)?;

    match format {
        OutputFormat::Json => output::print_json(&MintedToken {
            token,
            expires_at: expires_at.to_rfc3339(),
        }),
        OutputFormat::Table => {
            output::print_success(&format!("Token issued for '{}'", args.subject));
            output::print_kv("Role", args.role.as_str());
            output::print_kv("Expires", &expires_at.to_rfc3339());
            println!("{token}");
        }
    }
    Ok(())
}
