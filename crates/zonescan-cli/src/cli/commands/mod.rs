//! Command implementations.

pub mod check;
pub mod run;
pub mod scan;

use std::sync::Arc;
use tracing::debug;
use zonescan::client::mail::{LogMailer, SesMailer};
use zonescan::client::tracker::{LogTracker, SentryTracker};
use zonescan::{
    AlertRunner, AppConfigSource, CloudflareConnector, ConfigSource, EnvSource, ErrorTracker,
    FileSource, HttpSource, MailTransport, Notifier, ProcessEnv,
};

use crate::cli::args::SourceArgs;
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug)]
pub struct Context {
    /// Configuration source flags
    pub source: SourceArgs,

    /// Output format
    pub output_format: OutputFormat,

    /// Log emails instead of sending them
    pub dry_run: bool,
}

impl Context {
    /// The configuration source selected on the command line.
    pub fn config_source(&self) -> anyhow::Result<Box<dyn ConfigSource>> {
        let source = &self.source;

        if let Some(path) = &source.config {
            return Ok(Box::new(FileSource::new(path)));
        }
        if let Some(url) = &source.config_url {
            let mut http = HttpSource::new(url.as_str())?;
            if let Some(token) = &source.config_token {
                http = http.bearer_token(token.as_str());
            }
            return Ok(Box::new(http));
        }
        if source.appconfig {
            return Ok(Box::new(AppConfigSource::from_env()?));
        }
        if source.env_config {
            return Ok(Box::new(EnvSource::new()));
        }

        anyhow::bail!(
            "Configuration source required.\n\n\
             Pass one of:\n  \
             1. --config <FILE> (or ZONESCAN_CONFIG)\n  \
             2. --config-url <URL>\n  \
             3. --appconfig\n  \
             4. --env-config"
        )
    }

    /// SES, or a logging transport in dry-run mode.
    pub async fn mail_transport(&self) -> Arc<dyn MailTransport> {
        if self.dry_run {
            return Arc::new(LogMailer);
        }
        let mailer = SesMailer::from_env().await;
        debug!(region = mailer.region().unwrap_or("unset"), "sending mail through SES");
        Arc::new(mailer)
    }

    /// Sentry when `SENTRY_DSN` is set, otherwise the log.
    pub fn error_tracker(&self) -> anyhow::Result<Arc<dyn ErrorTracker>> {
        match env_var("SENTRY_DSN") {
            Some(dsn) => {
                let environment = env_var("APP_ENV").unwrap_or_else(|| "prod".to_string());
                Ok(Arc::new(SentryTracker::new(&dsn, environment)?))
            }
            None => Ok(Arc::new(LogTracker)),
        }
    }

    /// Runner wired to Cloudflare and the selected transports.
    pub async fn runner(&self) -> anyhow::Result<AlertRunner> {
        let notifier = Notifier::new(self.mail_transport().await, self.error_tracker()?);
        Ok(Self::runner_with(notifier))
    }

    /// Runner that never sends email or reports errors remotely.
    pub fn offline_runner() -> AlertRunner {
        Self::runner_with(Notifier::new(Arc::new(LogMailer), Arc::new(LogTracker)))
    }

    fn runner_with(notifier: Notifier) -> AlertRunner {
        AlertRunner::new(
            Arc::new(CloudflareConnector::new()),
            notifier,
            Box::new(ProcessEnv),
        )
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
