//! `zonescan check` - Validate the configuration.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use zonescan::{check_alerts, ProcessEnv};

use super::Context;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context) -> Result<()> {
    let source = ctx.config_source()?;
    let config = source.load().await?;
    let checks = check_alerts(&config, &ProcessEnv);
    let invalid = checks.iter().filter(|c| c.result.is_err()).count();

    match ctx.output_format {
        OutputFormat::Json => {
            let entries: Vec<_> = checks
                .iter()
                .map(|check| match &check.result {
                    Ok(alert) => json!({
                        "title": check.title,
                        "valid": true,
                        "zones": alert.zone_names,
                        "recipients": alert.recipient_emails.len(),
                    }),
                    Err(e) => json!({
                        "title": check.title,
                        "valid": false,
                        "missing": e.field.to_string(),
                        "error": e.to_string(),
                    }),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Pretty => {
            println!("{} {}", "Source:".bold(), source.describe());
            println!();
            for check in &checks {
                match &check.result {
                    Ok(alert) => println!(
                        "  {} {} ({} zones, {} recipients)",
                        "ok".green(),
                        check.title,
                        alert.zone_names.len(),
                        alert.recipient_emails.len()
                    ),
                    Err(e) => println!("  {} {}: {}", "invalid".red(), check.title, e),
                }
            }
        }
    }

    if invalid > 0 {
        anyhow::bail!("{invalid} of {} alerts failed validation", checks.len());
    }
    Ok(())
}
