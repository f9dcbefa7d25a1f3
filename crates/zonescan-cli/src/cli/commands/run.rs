//! `zonescan run` - Scan every alert and send the reports.

use anyhow::Result;
use colored::Colorize;
use zonescan::{AlertStatus, RunOutcome};

use super::Context;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context) -> Result<()> {
    let source = ctx.config_source()?;
    let runner = ctx.runner().await?;

    let outcome = runner.run_from(source.as_ref()).await?;

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        OutputFormat::Pretty => print_summary(&outcome, ctx.dry_run),
    }

    Ok(())
}

fn print_summary(outcome: &RunOutcome, dry_run: bool) {
    if dry_run {
        println!("{}", "Dry run: no email was sent.".yellow());
        println!();
    }

    for alert in &outcome.alerts {
        let status = match &alert.status {
            AlertStatus::Notified { matches, outcome } if outcome.is_success() => {
                format!("{matches} matches, sent to {} recipients", outcome.delivered())
                    .green()
                    .to_string()
            }
            AlertStatus::Notified { matches, outcome } => format!(
                "{matches} matches, sent to {}/{} recipients (failed: {})",
                outcome.delivered(),
                outcome.attempted,
                outcome.failed_recipients.join(", ")
            )
            .yellow()
            .to_string(),
            AlertStatus::NoMatches => "no matches".dimmed().to_string(),
            AlertStatus::Skipped { field } => format!("skipped: {field} is missing").red().to_string(),
            AlertStatus::Failed { error } => format!("failed: {error}").red().to_string(),
        };
        println!("  {} {}", alert.title.bold(), status);
    }

    println!();
    println!(
        "{} {} alerts, {} notified, {} without matches, {} skipped, {} failed",
        "Summary:".bold(),
        outcome.alerts.len(),
        outcome.notified().to_string().cyan(),
        outcome.without_matches(),
        outcome.skipped(),
        outcome.failed()
    );
}
