//! Report formatting and per-recipient dispatch.

use std::sync::Arc;
use tracing::{debug, error, info, warn};
use zonescan_core::{
    Alert, DeliveryOutcome, ErrorTracker, MailMessage, MailTransport, ScanError, ScanResult,
};

/// Subject of every error report
pub const ERROR_SUBJECT: &str = "error attempting to scan Cloudflare.";

const ERROR_PREAMBLE: &str = "The Cloudflare scanner failed with the following error. \n";

/// Body of the success report: the subject, a blank line, then one block per
/// zone. Zone blocks follow each other without a blank line between them.
#[must_use]
pub fn format_report(subject: &str, result: &ScanResult) -> String {
    let mut body = format!("{subject}\n");
    for zone in result {
        body.push_str("\n Those found in ");
        body.push_str(&zone.zone);
        for line in &zone.matches {
            body.push('\n');
            body.push_str(line);
        }
    }
    body
}

/// Body of the error report
#[must_use]
pub fn format_error(err: &ScanError) -> String {
    format!("{ERROR_PREAMBLE}{err}")
}

/// Sends success and error reports to an alert's recipients.
///
/// Delivery to one recipient never depends on another: every recipient is
/// tried in order and failures are folded into a [`DeliveryOutcome`].
#[derive(Clone)]
pub struct Notifier {
    mail: Arc<dyn MailTransport>,
    tracker: Arc<dyn ErrorTracker>,
}

impl Notifier {
    pub fn new(mail: Arc<dyn MailTransport>, tracker: Arc<dyn ErrorTracker>) -> Self {
        Self { mail, tracker }
    }

    /// The tracker errors are forwarded to
    pub fn tracker(&self) -> &dyn ErrorTracker {
        self.tracker.as_ref()
    }

    /// Send the success report for a non-empty scan result
    pub async fn notify(&self, alert: &Alert, result: &ScanResult) -> DeliveryOutcome {
        let message = MailMessage {
            subject: alert.subject_text.clone(),
            body: format_report(&alert.subject_text, result),
            char_set: alert.char_set.clone(),
            sender: alert.return_to_address.clone(),
        };
        self.dispatch(&message, &alert.recipient_emails).await
    }

    /// Forward `err` to the tracker, then email it to the alert's recipients
    pub async fn notify_error(&self, alert: &Alert, err: &ScanError) -> DeliveryOutcome {
        self.tracker.report(err).await;

        let message = MailMessage {
            subject: ERROR_SUBJECT.to_string(),
            body: format_error(err),
            char_set: alert.char_set.clone(),
            sender: alert.return_to_address.clone(),
        };
        self.dispatch(&message, &alert.recipient_emails).await
    }

    /// Send `message` to every recipient in order.
    ///
    /// When any send fails a single consolidated error naming every failed
    /// recipient and the last failure is logged and reported.
    pub async fn dispatch(&self, message: &MailMessage, recipients: &[String]) -> DeliveryOutcome {
        let mut outcome = DeliveryOutcome::default();

        for recipient in recipients {
            match self.mail.send(message, recipient).await {
                Ok(()) => {
                    debug!(recipient = %recipient, "report delivered");
                    outcome.record_success();
                }
                Err(e) => {
                    let err = ScanError::Delivery {
                        recipient: recipient.clone(),
                        cause: e.to_string(),
                    };
                    warn!("{err}");
                    outcome.record_failure(recipient, e.to_string());
                }
            }
        }

        if let Some(last_error) = &outcome.last_error {
            let err = ScanError::DeliveryBatch {
                sender: message.sender.clone(),
                recipients: outcome.failed_recipients.clone(),
                last_error: last_error.clone(),
            };
            error!("{err}");
            self.tracker.report(&err).await;
        } else {
            info!(
                subject = %message.subject,
                recipients = outcome.attempted,
                "report sent to all recipients"
            );
        }

        outcome
    }
}
