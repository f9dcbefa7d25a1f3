//! In-memory collaborators for pipeline tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use zonescan_core::{
    DnsProvider, DnsProviderFactory, ErrorTracker, MailMessage, MailTransport, Result, ScanError,
    ZoneRecord,
};

/// Records every send; fails for a fixed set of recipients
#[derive(Default)]
pub struct FakeMail {
    failing: HashSet<String>,
    sent: Mutex<Vec<(MailMessage, String)>>,
}

impl FakeMail {
    pub fn failing<I: IntoIterator<Item = &'static str>>(recipients: I) -> Self {
        Self {
            failing: recipients.into_iter().map(String::from).collect(),
            sent: Mutex::default(),
        }
    }

    /// Every attempted send, including failed ones
    pub fn sent(&self) -> Vec<(MailMessage, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, r)| r).collect()
    }
}

#[async_trait]
impl MailTransport for FakeMail {
    async fn send(&self, message: &MailMessage, recipient: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((message.clone(), recipient.to_string()));
        if self.failing.contains(recipient) {
            return Err(ScanError::Http(format!("mailbox unavailable: {recipient}")));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingTracker {
    reports: Mutex<Vec<String>>,
}

impl RecordingTracker {
    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ErrorTracker for RecordingTracker {
    async fn report(&self, error: &ScanError) {
        self.reports.lock().unwrap().push(error.to_string());
    }
}

/// Zones keyed by name; zone ids are `id-<name>`
#[derive(Default)]
pub struct FakeProvider {
    zones: HashMap<String, Vec<ZoneRecord>>,
    failing_lookup: HashSet<String>,
    failing_listing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn zone(mut self, name: &str, records: &[(&str, &str)]) -> Self {
        self.zones.insert(
            name.to_string(),
            records.iter().map(|(n, c)| ZoneRecord::new(*n, *c)).collect(),
        );
        self
    }

    #[must_use]
    pub fn failing_lookup(mut self, name: &str) -> Self {
        self.failing_lookup.insert(name.to_string());
        self
    }

    #[must_use]
    pub fn failing_listing(mut self, name: &str) -> Self {
        self.failing_listing.insert(name.to_string());
        self
    }

    /// Provider calls in order, as `resolve:<name>` or `list:<id>`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsProvider for FakeProvider {
    async fn resolve_zone(&self, name: &str) -> Result<String> {
        self.calls.lock().unwrap().push(format!("resolve:{name}"));
        if self.failing_lookup.contains(name) || !self.zones.contains_key(name) {
            return Err(ScanError::NotFound {
                resource: format!("zone {name}"),
            });
        }
        Ok(format!("id-{name}"))
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<ZoneRecord>> {
        self.calls.lock().unwrap().push(format!("list:{zone_id}"));
        let name = zone_id.trim_start_matches("id-");
        if self.failing_listing.contains(name) {
            return Err(ScanError::Api {
                code: 500,
                message: "internal server error".to_string(),
            });
        }
        Ok(self.zones.get(name).cloned().unwrap_or_default())
    }
}

/// Hands out one shared provider and remembers the credentials it was asked for
pub struct FakeFactory {
    provider: Arc<FakeProvider>,
    credentials: Mutex<Vec<String>>,
}

impl FakeFactory {
    pub fn new(provider: FakeProvider) -> Self {
        Self {
            provider: Arc::new(provider),
            credentials: Mutex::default(),
        }
    }

    pub fn credentials(&self) -> Vec<String> {
        self.credentials.lock().unwrap().clone()
    }
}

impl DnsProviderFactory for FakeFactory {
    fn connect(&self, credential: &str) -> Result<Arc<dyn DnsProvider>> {
        self.credentials.lock().unwrap().push(credential.to_string());
        Ok(self.provider.clone())
    }
}
