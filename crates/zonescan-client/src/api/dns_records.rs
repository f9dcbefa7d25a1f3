//! DNS record API endpoints.

use crate::CloudflareClient;
use tracing::debug;
use zonescan_core::{Result, ZoneRecord};

/// DNS record API endpoints
pub struct DnsRecordsApi<'a> {
    client: &'a CloudflareClient,
}

impl<'a> DnsRecordsApi<'a> {
    pub(crate) const fn new(client: &'a CloudflareClient) -> Self {
        Self { client }
    }

    /// Fetch one page of records for a zone, with the total page count
    pub async fn page(&self, zone_id: &str, page: u32) -> Result<(Vec<ZoneRecord>, u32)> {
        let page_str = page.to_string();
        let per_page = self.client.page_size().to_string();

        let envelope = self
            .client
            .get::<Vec<ZoneRecord>>(
                &format!("/zones/{zone_id}/dns_records"),
                &[("page", &page_str), ("per_page", &per_page)],
            )
            .await?;

        let total_pages = envelope.result_info.map_or(page, |info| info.total_pages);
        Ok((envelope.result.unwrap_or_default(), total_pages))
    }

    /// Fetch every record in a zone, following pagination to the end
    pub async fn list(&self, zone_id: &str) -> Result<Vec<ZoneRecord>> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let (batch, total_pages) = self.page(zone_id, page).await?;
            let empty = batch.is_empty();
            records.extend(batch);

            if empty || page >= total_pages {
                break;
            }
            page += 1;
        }

        debug!(zone_id = %zone_id, records = records.len(), pages = page, "listed records");
        Ok(records)
    }
}
