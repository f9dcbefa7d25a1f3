//! Traits for the collaborators the scanner talks to.
//!
//! The pipeline only sees these traits; HTTP implementations live in
//! `zonescan-client` and tests supply in-memory fakes.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Result, ScanError};
use crate::types::ZoneRecord;

/// Read access to a DNS provider's zones
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Resolve a zone name to the provider's zone identifier
    async fn resolve_zone(&self, name: &str) -> Result<String>;

    /// List every record in a resolved zone
    async fn list_records(&self, zone_id: &str) -> Result<Vec<ZoneRecord>>;
}

/// Builds a [`DnsProvider`] authenticated with an alert's credential
pub trait DnsProviderFactory: Send + Sync {
    /// Create a provider for the given API token
    fn connect(&self, credential: &str) -> Result<Arc<dyn DnsProvider>>;
}

/// A plain-text message ready to be sent to one recipient at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
    /// Character set for subject and body
    pub char_set: String,
    /// Sender address
    pub sender: String,
}

/// Sends one message to one recipient
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver `message` to `recipient`
    async fn send(&self, message: &MailMessage, recipient: &str) -> Result<()>;
}

/// Best-effort sink for operational errors.
///
/// Implementations must not fail the caller; delivery problems are theirs
/// to log.
#[async_trait]
pub trait ErrorTracker: Send + Sync {
    /// Record an error
    async fn report(&self, error: &ScanError);
}

#[async_trait]
impl<T: DnsProvider + ?Sized> DnsProvider for Arc<T> {
    async fn resolve_zone(&self, name: &str) -> Result<String> {
        (**self).resolve_zone(name).await
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<ZoneRecord>> {
        (**self).list_records(zone_id).await
    }
}

#[async_trait]
impl<T: MailTransport + ?Sized> MailTransport for Arc<T> {
    async fn send(&self, message: &MailMessage, recipient: &str) -> Result<()> {
        (**self).send(message, recipient).await
    }
}

#[async_trait]
impl<T: ErrorTracker + ?Sized> ErrorTracker for Arc<T> {
    async fn report(&self, error: &ScanError) {
        (**self).report(error).await;
    }
}
