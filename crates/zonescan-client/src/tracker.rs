//! Error trackers.
//!
//! Both trackers are best effort: a report that cannot be delivered is
//! logged and dropped.

use async_trait::async_trait;
use sentry::types::Dsn;
use sentry::ClientInitGuard;
use tracing::{debug, error};
use zonescan_core::{ErrorTracker, Result, ScanError};

/// Logs every reported error and nothing else
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracker;

#[async_trait]
impl ErrorTracker for LogTracker {
    async fn report(&self, err: &ScanError) {
        error!(kind = err.kind(), "{err}");
    }
}

/// Reports errors through the Sentry SDK.
///
/// Owns the SDK client; pending events are flushed when it is dropped.
pub struct SentryTracker {
    _guard: ClientInitGuard,
}

impl SentryTracker {
    /// Initialise Sentry for `dsn`, tagging events with `environment`
    pub fn new(dsn: &str, environment: impl Into<String>) -> Result<Self> {
        let dsn: Dsn = dsn
            .parse()
            .map_err(|e| ScanError::Config(format!("invalid Sentry DSN: {e}")))?;

        let guard = sentry::init(sentry::ClientOptions {
            dsn: Some(dsn),
            environment: Some(environment.into().into()),
            release: sentry::release_name!(),
            ..Default::default()
        });

        Ok(Self { _guard: guard })
    }
}

/// Capture `err` on the current hub with its kind and zone as tags
fn capture(err: &ScanError) {
    sentry::with_scope(
        |scope| {
            scope.set_tag("kind", err.kind());
            if let Some(zone) = err.zone() {
                scope.set_tag("zone", zone);
            }
        },
        || sentry::capture_error(err),
    );
}

#[async_trait]
impl ErrorTracker for SentryTracker {
    async fn report(&self, err: &ScanError) {
        capture(err);
        debug!(kind = err.kind(), "reported error to Sentry");
    }
}
