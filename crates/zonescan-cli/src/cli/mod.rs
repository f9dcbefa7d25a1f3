//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let ctx = commands::Context {
        source: cli.source,
        output_format: cli.output.unwrap_or(OutputFormat::Pretty),
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Run => commands::run::execute(ctx).await,
        Commands::Scan(args) => commands::scan::execute(ctx, args).await,
        Commands::Check => commands::check::execute(ctx).await,
    }
}

/// Log to stderr, filtered by `RUST_LOG` when set
fn init_logging(verbose: bool) {
    let default = if verbose { "zonescan=debug" } else { "zonescan=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
