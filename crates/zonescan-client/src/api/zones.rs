//! Zone API endpoints.

use crate::CloudflareClient;
use serde::Deserialize;
use tracing::debug;
use zonescan_core::{Result, ScanError};

/// A Cloudflare zone
#[derive(Debug, Clone, Deserialize)]
pub struct Zone {
    /// Zone identifier
    pub id: String,

    /// Zone apex name
    pub name: String,

    /// Activation status (active, pending...)
    #[serde(default)]
    pub status: Option<String>,
}

/// Zone API endpoints
pub struct ZonesApi<'a> {
    client: &'a CloudflareClient,
}

impl<'a> ZonesApi<'a> {
    pub(crate) const fn new(client: &'a CloudflareClient) -> Self {
        Self { client }
    }

    /// List zones whose name is exactly `name`
    pub async fn list_by_name(&self, name: &str) -> Result<Vec<Zone>> {
        let envelope = self.client.get("/zones", &[("name", name)]).await?;
        Ok(envelope.result.unwrap_or_default())
    }

    /// Resolve a zone name to its identifier.
    ///
    /// Fails with `NotFound` when no zone matches and with a configuration
    /// error when the name is ambiguous across accounts.
    pub async fn id_by_name(&self, name: &str) -> Result<String> {
        let mut zones = self.list_by_name(name).await?;

        match zones.len() {
            0 => Err(ScanError::NotFound {
                resource: format!("zone {name}"),
            }),
            1 => {
                let zone = zones.remove(0);
                debug!(zone = %name, zone_id = %zone.id, "resolved zone");
                Ok(zone.id)
            }
            n => Err(ScanError::Config(format!(
                "ambiguous zone name {name}: {n} zones match"
            ))),
        }
    }
}
