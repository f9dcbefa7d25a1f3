//! Per-alert zone scanning.

use tracing::{debug, info, warn};
use zonescan_core::{filter_records, Alert, DnsProvider, ScanError, ScanResult};

use crate::notifier::Notifier;

/// Scans every zone of an alert and aggregates matches by zone.
///
/// A zone that cannot be resolved or listed is reported and skipped; the
/// remaining zones are still scanned. Without a notifier, zone failures are
/// only logged.
pub struct ZoneScanner<'a> {
    provider: &'a dyn DnsProvider,
    notifier: Option<&'a Notifier>,
}

impl<'a> ZoneScanner<'a> {
    pub const fn new(provider: &'a dyn DnsProvider) -> Self {
        Self {
            provider,
            notifier: None,
        }
    }

    /// Send zone failures through the notifier's error path
    #[must_use]
    pub const fn with_notifier(mut self, notifier: &'a Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Scan the zones of a validated alert, in order
    pub async fn scan(&self, alert: &Alert) -> ScanResult {
        let mut result = ScanResult::new();

        for zone in &alert.zone_names {
            let zone_id = match self.provider.resolve_zone(zone).await {
                Ok(id) => id,
                Err(e) => {
                    self.zone_failed(alert, ScanError::zone_lookup(zone, e)).await;
                    continue;
                }
            };

            let records = match self.provider.list_records(&zone_id).await {
                Ok(records) => records,
                Err(e) => {
                    self.zone_failed(alert, ScanError::record_listing(zone, e)).await;
                    continue;
                }
            };
            debug!(zone = %zone, records = records.len(), "listed zone records");

            for substring in alert.trimmed_contains() {
                result.append(zone, filter_records(&records, substring));
            }

            if let Some(matches) = result.get(zone) {
                info!(zone = %zone, matches = matches.len(), "found matching records");
            }
        }

        result
    }

    async fn zone_failed(&self, alert: &Alert, err: ScanError) {
        warn!(zone = err.zone().unwrap_or_default(), "{err}");
        if let Some(notifier) = self.notifier {
            notifier.notify_error(alert, &err).await;
        }
    }
}
