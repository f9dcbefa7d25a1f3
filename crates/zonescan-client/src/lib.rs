//! HTTP clients for the zonescan DNS record scanner.
//!
//! - [`CloudflareClient`]: read-only access to Cloudflare zones and DNS records,
//!   also usable as a [`DnsProvider`](zonescan_core::DnsProvider)
//! - [`mail::SesMailer`]: Amazon SES v2 mail transport over the AWS SDK
//! - [`tracker::SentryTracker`]: best-effort error reporting to Sentry
//!
//! # Example
//!
//! ```rust,ignore
//! use zonescan_client::CloudflareClient;
//!
//! let client = CloudflareClient::new("api-token")?;
//! let zone_id = client.zones().id_by_name("example.com").await?;
//! for record in client.dns_records().list(&zone_id).await? {
//!     println!("{} -> {}", record.name, record.content);
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/zonescan-client/0.3.0")]

mod client;
mod provider;
pub mod api;
pub mod mail;
pub mod tracker;

pub use client::{CloudflareClient, CloudflareClientBuilder};
pub use provider::CloudflareConnector;
pub use zonescan_core::{Result, ScanError};
