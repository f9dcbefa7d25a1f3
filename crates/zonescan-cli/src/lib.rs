//! # zonescan-cli
//!
//! Command-line runner for the zonescan DNS record scanner.
//!
//! ## Commands
//!
//! - **run**: load the configuration, scan every alert and send reports
//! - **scan**: scan only and print the matches, nothing is sent
//! - **check**: load and validate the configuration without any network calls
//!   to the DNS provider
//!
//! ## Output formats
//!
//! Pretty text (default) or JSON, selected with `--output`.

pub mod cli;
pub mod output;

pub use cli::run;
