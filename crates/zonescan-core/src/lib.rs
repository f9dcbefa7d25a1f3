//! Core types and traits for the zonescan DNS record scanner.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - **Types**: alert definitions, scanner configuration, zone records and scan results
//! - **Filtering**: the substring match applied to every zone's records
//! - **Validation**: defaulting and required-field checks for alerts
//! - **Capabilities**: traits for the DNS provider, mail transport and error tracker
//! - **Errors**: error handling with [`ScanError`]
//!
//! # Example
//!
//! ```rust
//! use zonescan_core::{filter_records, ZoneRecord};
//!
//! let records = vec![
//!     ZoneRecord::new("staging.example.com", "1.2.3.4"),
//!     ZoneRecord::new("prod.example.com", "5.6.7.8"),
//! ];
//!
//! let matches = filter_records(&records, "staging");
//! assert_eq!(matches, vec!["staging.example.com ... 1.2.3.4"]);
//! ```

#![doc(html_root_url = "https://docs.rs/zonescan-core/0.3.0")]

pub mod capability;
mod error;
mod filter;
pub mod types;
pub mod validate;

pub use capability::{DnsProvider, DnsProviderFactory, ErrorTracker, MailMessage, MailTransport};
pub use error::{RequiredField, Result, ScanError, ValidationError};
pub use filter::filter_records;
pub use types::*;
pub use validate::{validate, FieldSource, NoFallback, ProcessEnv};
