//! [`DnsProvider`] glue for the Cloudflare client.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use zonescan_core::{DnsProvider, DnsProviderFactory, Result, ZoneRecord};

use crate::client::{CloudflareClient, CloudflareClientBuilder};

#[async_trait]
impl DnsProvider for CloudflareClient {
    async fn resolve_zone(&self, name: &str) -> Result<String> {
        self.zones().id_by_name(name).await
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<ZoneRecord>> {
        self.dns_records().list(zone_id).await
    }
}

/// Creates a [`CloudflareClient`] per alert credential
#[derive(Debug, Clone, Default)]
pub struct CloudflareConnector {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl CloudflareConnector {
    /// Connector using the public Cloudflare API
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point every client at a different base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout for every client
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl DnsProviderFactory for CloudflareConnector {
    fn connect(&self, credential: &str) -> Result<Arc<dyn DnsProvider>> {
        let mut builder = CloudflareClientBuilder::new(credential);
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url.clone());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Arc::new(builder.build()?))
    }
}
