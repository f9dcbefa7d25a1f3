//! Orchestration of one scanner invocation.

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use zonescan_core::{
    validate, Alert, DeliveryOutcome, DnsProviderFactory, FieldSource, RequiredField, Result,
    ScanError, ScanResult, ScannerConfig, ValidationError,
};

use crate::notifier::Notifier;
use crate::scanner::ZoneScanner;
use crate::source::ConfigSource;

const UNTITLED: &str = "<untitled>";

/// What happened to one alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlertStatus {
    /// Validation failed on `field`; nothing was scanned
    Skipped {
        #[serde(serialize_with = "serialize_field")]
        field: RequiredField,
    },
    /// The provider could not be set up for the alert's credential
    Failed { error: String },
    /// Scan finished with no matches; nothing was sent
    NoMatches,
    /// A report was sent
    Notified {
        matches: usize,
        outcome: DeliveryOutcome,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_field<S: serde::Serializer>(
    field: &RequiredField,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(field)
}

/// Per-alert entry of a [`RunOutcome`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertReport {
    pub title: String,
    #[serde(flatten)]
    pub status: AlertStatus,
}

/// Aggregate result of one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub alerts: Vec<AlertReport>,
}

impl RunOutcome {
    fn count(&self, pred: impl Fn(&AlertStatus) -> bool) -> usize {
        self.alerts.iter().filter(|a| pred(&a.status)).count()
    }

    pub fn notified(&self) -> usize {
        self.count(|s| matches!(s, AlertStatus::Notified { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, AlertStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, AlertStatus::Failed { .. }))
    }

    pub fn without_matches(&self) -> usize {
        self.count(|s| matches!(s, AlertStatus::NoMatches))
    }

    /// Alerts whose report missed at least one recipient
    pub fn partial_deliveries(&self) -> usize {
        self.count(|s| matches!(s, AlertStatus::Notified { outcome, .. } if !outcome.is_success()))
    }
}

/// Result of validating one alert without scanning it
#[derive(Debug, Clone)]
pub struct AlertCheck {
    pub title: String,
    pub result: std::result::Result<Alert, ValidationError>,
}

/// Validate every alert of `config` against `fields`, in order
pub fn check_alerts(config: &ScannerConfig, fields: &dyn FieldSource) -> Vec<AlertCheck> {
    let defaults = config.defaults();
    config
        .alerts
        .iter()
        .map(|alert| AlertCheck {
            title: display_title(alert).to_string(),
            result: validate(alert.clone(), &defaults, fields),
        })
        .collect()
}

fn display_title(alert: &Alert) -> &str {
    if alert.title.is_empty() {
        UNTITLED
    } else {
        &alert.title
    }
}

/// Runs validate, scan and notify for every alert of a configuration.
///
/// Alerts are processed sequentially in configured order. A failure in one
/// alert never stops the next one.
pub struct AlertRunner {
    providers: Arc<dyn DnsProviderFactory>,
    notifier: Notifier,
    fields: Box<dyn FieldSource + Send + Sync>,
}

impl AlertRunner {
    pub fn new(
        providers: Arc<dyn DnsProviderFactory>,
        notifier: Notifier,
        fields: Box<dyn FieldSource + Send + Sync>,
    ) -> Self {
        Self {
            providers,
            notifier,
            fields,
        }
    }

    /// Load the configuration from `source` and run it.
    ///
    /// A configuration that cannot be loaded is the only error returned; it is
    /// also forwarded to the error tracker.
    pub async fn run_from(&self, source: &dyn ConfigSource) -> Result<RunOutcome> {
        let config = match source.load().await {
            Ok(config) => config,
            Err(e) => {
                error!(source = %source.describe(), "{e}");
                self.notifier.tracker().report(&e).await;
                return Err(e);
            }
        };
        info!(source = %source.describe(), alerts = config.alerts.len(), "loaded scanner configuration");
        Ok(self.run(&config).await)
    }

    /// Run every alert of an already loaded configuration
    pub async fn run(&self, config: &ScannerConfig) -> RunOutcome {
        let defaults = config.defaults();
        let mut outcome = RunOutcome::default();

        for alert in &config.alerts {
            let title = display_title(alert).to_string();
            let status = match validate(alert.clone(), &defaults, self.fields.as_ref()) {
                Ok(alert) => {
                    self.run_alert(&alert)
                        .instrument(info_span!("alert", title = %title))
                        .await
                }
                Err(e) => {
                    warn!(alert = %title, "skipping alert: {e}");
                    self.notifier.tracker().report(&ScanError::from(e.clone())).await;
                    AlertStatus::Skipped { field: e.field }
                }
            };
            outcome.alerts.push(AlertReport { title, status });
        }

        info!(
            alerts = outcome.alerts.len(),
            notified = outcome.notified(),
            no_matches = outcome.without_matches(),
            skipped = outcome.skipped(),
            failed = outcome.failed(),
            "scan complete"
        );
        outcome
    }

    /// Scan one alert without sending anything
    pub async fn scan_only(&self, alert: &Alert) -> Result<ScanResult> {
        let provider = self.providers.connect(&alert.provider_credential)?;
        Ok(ZoneScanner::new(provider.as_ref()).scan(alert).await)
    }

    async fn run_alert(&self, alert: &Alert) -> AlertStatus {
        let provider = match self.providers.connect(&alert.provider_credential) {
            Ok(provider) => provider,
            Err(e) => {
                self.notifier.notify_error(alert, &e).await;
                return AlertStatus::Failed {
                    error: e.to_string(),
                };
            }
        };

        let result = ZoneScanner::new(provider.as_ref())
            .with_notifier(&self.notifier)
            .scan(alert)
            .await;

        if result.is_empty() {
            info!("no matching records, nothing to send");
            return AlertStatus::NoMatches;
        }

        let outcome = self.notifier.notify(alert, &result).await;
        AlertStatus::Notified {
            matches: result.match_count(),
            outcome,
        }
    }
}
