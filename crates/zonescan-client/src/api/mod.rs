//! API endpoint modules and the Cloudflare response envelope.

mod dns_records;
mod zones;

pub use dns_records::DnsRecordsApi;
pub use zones::{Zone, ZonesApi};

use serde::Deserialize;

/// Standard Cloudflare v4 response wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Whether the API call succeeded
    pub success: bool,

    /// Errors reported by the API
    #[serde(default)]
    pub errors: Vec<ApiMessage>,

    /// Response payload
    pub result: Option<T>,

    /// Pagination details for list endpoints
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

impl<T> Envelope<T> {
    /// All error messages joined into one line
    #[must_use]
    pub fn error_message(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A single error or message entry
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    /// Cloudflare error code
    #[serde(default)]
    pub code: u32,

    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// Pagination details
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ResultInfo {
    /// Current page (1-indexed)
    #[serde(default)]
    pub page: u32,

    /// Items per page
    #[serde(default)]
    pub per_page: u32,

    /// Items on this page
    #[serde(default)]
    pub count: u32,

    /// Items across all pages
    #[serde(default)]
    pub total_count: u32,

    /// Number of pages
    #[serde(default)]
    pub total_pages: u32,
}

impl ResultInfo {
    /// Returns true if pages remain after this one
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}
