//! Scan Cloudflare zones for stale DNS records and email a report.
//!
//! Each alert of a [`ScannerConfig`] names zones, substrings to look for in
//! record names, and the people to tell. One invocation validates every
//! alert, scans its zones, and mails each recipient a report listing the
//! matching records. Failures stay local: a bad zone, alert, or recipient
//! is reported and the run carries on.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use zonescan::{AlertRunner, CloudflareConnector, FileSource, Notifier, ProcessEnv};
//! use zonescan::client::{mail::SesMailer, tracker::LogTracker};
//!
//! #[tokio::main]
//! async fn main() -> zonescan::Result<()> {
//!     let notifier = Notifier::new(Arc::new(SesMailer::from_env().await), Arc::new(LogTracker));
//!     let runner = AlertRunner::new(
//!         Arc::new(CloudflareConnector::new()),
//!         notifier,
//!         Box::new(ProcessEnv),
//!     );
//!
//!     let outcome = runner.run_from(&FileSource::new("scanner.json")).await?;
//!     println!("{} alerts notified", outcome.notified());
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/zonescan/0.3.0")]

pub mod notifier;
pub mod runner;
pub mod scanner;
pub mod source;

#[cfg(test)]
mod testing;

pub use notifier::Notifier;
pub use runner::{check_alerts, AlertCheck, AlertReport, AlertRunner, AlertStatus, RunOutcome};
pub use scanner::ZoneScanner;
pub use source::{AppConfigSource, ConfigSource, EnvSource, FileSource, HttpSource};

// Re-export core types
pub use zonescan_core::*;

// Re-export clients
pub use zonescan_client as client;
pub use zonescan_client::{CloudflareClient, CloudflareClientBuilder, CloudflareConnector};

// Re-export runtime for convenience
pub use serde_json;
pub use tokio;
