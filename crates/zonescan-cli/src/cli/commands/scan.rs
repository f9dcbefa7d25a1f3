//! `zonescan scan` - Scan and print matches without sending anything.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use zonescan::{check_alerts, ProcessEnv};

use super::Context;
use crate::cli::args::ScanArgs;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: ScanArgs) -> Result<()> {
    let config = ctx.config_source()?.load().await?;
    let runner = Context::offline_runner();

    let mut report = Vec::new();
    for check in check_alerts(&config, &ProcessEnv) {
        if args.alert.as_ref().is_some_and(|wanted| *wanted != check.title) {
            continue;
        }

        let entry = match check.result {
            Ok(alert) => match runner.scan_only(&alert).await {
                Ok(result) => json!({ "title": check.title, "matches": result }),
                Err(e) => json!({ "title": check.title, "error": e.to_string() }),
            },
            Err(e) => json!({ "title": check.title, "error": e.to_string() }),
        };
        report.push(entry);
    }

    if let Some(wanted) = &args.alert {
        if report.is_empty() {
            anyhow::bail!("No alert titled {wanted:?} in the configuration");
        }
    }

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Pretty => print_report(&report),
    }

    Ok(())
}

fn print_report(report: &[serde_json::Value]) {
    for entry in report {
        let title = entry["title"].as_str().unwrap_or_default();
        println!("{}", title.bold());

        if let Some(error) = entry["error"].as_str() {
            println!("  {}", error.red());
            println!();
            continue;
        }

        let zones = entry["matches"].as_object();
        match zones {
            Some(zones) if !zones.is_empty() => {
                for (zone, lines) in zones {
                    println!("  {}", zone.cyan());
                    for line in lines.as_array().into_iter().flatten() {
                        println!("    {}", line.as_str().unwrap_or_default());
                    }
                }
            }
            _ => println!("  {}", "no matches".dimmed()),
        }
        println!();
    }
}
