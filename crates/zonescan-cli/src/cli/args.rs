//! Command-line argument definitions using clap.

use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Scan Cloudflare zones for DNS records matching configured substrings
///
/// Every alert in the configuration names zones, substrings and recipients.
/// Matching records are mailed to the recipients through Amazon SES.
///
/// AWS credentials come from AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY.
/// Set SENTRY_DSN to forward errors to Sentry.
#[derive(Parser, Debug)]
#[command(name = "zonescan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Log what would be sent instead of sending email
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the scanner configuration is read from. At most one may be given,
/// before the subcommand.
#[derive(Args, Debug, Default)]
#[command(group(
    ArgGroup::new("config_source")
        .args(["config", "config_url", "appconfig", "env_config"])
        .multiple(false)
))]
pub struct SourceArgs {
    /// Configuration file (JSON, or TOML with a .toml extension)
    #[arg(short, long, env = "ZONESCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Fetch the JSON configuration from a URL
    #[arg(long)]
    pub config_url: Option<String>,

    /// Bearer token sent with --config-url
    #[arg(long, env = "ZONESCAN_CONFIG_TOKEN", hide_env_values = true)]
    pub config_token: Option<String>,

    /// Read the configuration from AWS AppConfig (APPCONFIG_AGENT_URL selects a local agent)
    #[arg(long)]
    pub appconfig: bool,

    /// Build a single alert from CF_* / SES_* / RECIPIENT_EMAILS variables
    #[arg(long)]
    pub env_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan every alert and email the reports
    Run,

    /// Scan every valid alert and print the matches without sending anything
    Scan(ScanArgs),

    /// Load and validate the configuration
    Check,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Only scan alerts with this title
    #[arg(short, long)]
    pub alert: Option<String>,
}
