//! Mail transports.
//!
//! [`SesMailer`] sends through Amazon SES v2. [`LogMailer`] only logs what
//! would have been sent and backs dry runs.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_sesv2::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client as SesClient;
use tracing::{debug, info};
use zonescan_core::{MailMessage, MailTransport, Result, ScanError};

/// Amazon SES v2 mail transport
#[derive(Debug, Clone)]
pub struct SesMailer {
    client: SesClient,
}

impl SesMailer {
    /// Create a mailer from an already loaded AWS configuration
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: SesClient::new(config),
        }
    }

    /// Create a mailer from the default AWS credential and region chain.
    ///
    /// Environment keys, shared profiles, web identity, container and
    /// instance credentials are all honoured.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(&config)
    }

    /// Region requests are sent to, when one was resolved
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.client.config().region().map(AsRef::as_ref)
    }
}

fn text(data: &str, charset: &str) -> Result<Content> {
    Content::builder()
        .data(data)
        .charset(charset)
        .build()
        .map_err(|e| ScanError::Config(format!("invalid email content: {e}")))
}

fn email_content(message: &MailMessage) -> Result<EmailContent> {
    let simple = Message::builder()
        .subject(text(&message.subject, &message.char_set)?)
        .body(
            Body::builder()
                .text(text(&message.body, &message.char_set)?)
                .build(),
        )
        .build();
    Ok(EmailContent::builder().simple(simple).build())
}

#[async_trait]
impl MailTransport for SesMailer {
    async fn send(&self, message: &MailMessage, recipient: &str) -> Result<()> {
        debug!(recipient = %recipient, "SES SendEmail");

        let output = self
            .client
            .send_email()
            .from_email_address(&message.sender)
            .destination(Destination::builder().to_addresses(recipient).build())
            .content(email_content(message)?)
            .send()
            .await
            .map_err(|e| match e.raw_response().map(|r| r.status().as_u16()) {
                Some(code) => ScanError::Api {
                    code,
                    message: format!(
                        "send email failed: {}",
                        e.message().unwrap_or("unknown error")
                    ),
                },
                None => ScanError::Http(DisplayErrorContext(&e).to_string()),
            })?;

        info!(
            subject = %message.subject,
            recipient = %recipient,
            message_id = output.message_id().unwrap_or_default(),
            "sent email"
        );
        Ok(())
    }
}

/// Transport that logs messages instead of sending them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl MailTransport for LogMailer {
    async fn send(&self, message: &MailMessage, recipient: &str) -> Result<()> {
        info!(
            sender = %message.sender,
            recipient = %recipient,
            subject = %message.subject,
            charset = %message.char_set,
            "dry run, not sending email:\n{}",
            message.body
        );
        Ok(())
    }
}
