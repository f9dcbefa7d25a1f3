use std::fmt;
use thiserror::Error;

/// Result type alias for zonescan operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that can occur while loading configuration, scanning zones or delivering reports
#[derive(Error, Debug)]
pub enum ScanError {
    /// The scanner configuration could not be retrieved or decoded
    #[error("failed to load scanner configuration: {0}")]
    ConfigLoad(String),

    /// An alert is missing a required field after defaulting
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Resolving a zone name to its identifier failed
    #[error("error getting zone {zone}: {cause}")]
    ZoneLookup {
        /// Zone name as configured on the alert
        zone: String,
        /// Underlying provider failure
        #[source]
        cause: Box<ScanError>,
    },

    /// Listing the records of a resolved zone failed
    #[error("error getting records for zone {zone}: {cause}")]
    RecordListing {
        /// Zone name as configured on the alert
        zone: String,
        /// Underlying provider failure
        #[source]
        cause: Box<ScanError>,
    },

    /// Sending a message to a single recipient failed
    #[error("send email to {recipient} failed: {cause}")]
    Delivery {
        /// Recipient address
        recipient: String,
        /// Transport error message
        cause: String,
    },

    /// One or more recipients of a report could not be reached
    #[error("Error sending Cloudflare scanner email from {sender:?} to {:?}: {last_error}", .recipients.join(", "))]
    DeliveryBatch {
        /// Sender address used for the batch
        sender: String,
        /// Every recipient that failed, in send order
        recipients: Vec<String>,
        /// Message of the last failure observed
        last_error: String,
    },

    /// Authentication failed - invalid or missing API token
    #[error("authentication failed: invalid API token")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("rate limit exceeded, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after: Option<u64>,
    },

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// API returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code or provider error code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl ScanError {
    /// Wrap a provider failure raised while resolving `zone`
    #[must_use]
    pub fn zone_lookup(zone: impl Into<String>, cause: Self) -> Self {
        Self::ZoneLookup {
            zone: zone.into(),
            cause: Box::new(cause),
        }
    }

    /// Wrap a provider failure raised while listing the records of `zone`
    #[must_use]
    pub fn record_listing(zone: impl Into<String>, cause: Self) -> Self {
        Self::RecordListing {
            zone: zone.into(),
            cause: Box::new(cause),
        }
    }

    /// Short name of the error variant, used as the exception type in error reports
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ConfigLoad(_) => "ConfigLoadError",
            Self::Validation(_) => "ValidationError",
            Self::ZoneLookup { .. } | Self::RecordListing { .. } => "ProviderError",
            Self::Delivery { .. } | Self::DeliveryBatch { .. } => "DeliveryError",
            Self::Unauthorized => "Unauthorized",
            Self::RateLimited { .. } => "RateLimited",
            Self::NotFound { .. } => "NotFound",
            Self::Api { .. } => "ApiError",
            Self::Http(_) => "HttpError",
            Self::Json(_) => "JsonError",
            Self::InvalidUrl(_) => "InvalidUrl",
            Self::Config(_) => "ConfigError",
        }
    }

    /// Returns true if the error is fatal for the whole invocation
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ConfigLoad(_))
    }

    /// Returns true if the error came from the DNS provider for a single zone
    #[must_use]
    pub const fn is_provider_error(&self) -> bool {
        matches!(self, Self::ZoneLookup { .. } | Self::RecordListing { .. })
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns the zone name for provider errors
    #[must_use]
    pub fn zone(&self) -> Option<&str> {
        match self {
            Self::ZoneLookup { zone, .. } | Self::RecordListing { zone, .. } => Some(zone),
            _ => None,
        }
    }
}

/// Alert fields that must be non-empty before a scan starts.
///
/// The declaration order is the order in which [`crate::validate`] checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    /// DNS provider API token
    Credential,
    /// Substrings to look for in record names
    ContainsStrings,
    /// Zones to scan
    ZoneNames,
    /// Report recipients
    RecipientEmails,
    /// Sender address
    ReturnToAddress,
    /// Report subject line
    SubjectText,
}

impl RequiredField {
    /// Every required field, in check order
    pub const ALL: [Self; 6] = [
        Self::Credential,
        Self::ContainsStrings,
        Self::ZoneNames,
        Self::RecipientEmails,
        Self::ReturnToAddress,
        Self::SubjectText,
    ];

    /// Field name as it appears in the JSON configuration
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Credential => "CFApiToken",
            Self::ContainsStrings => "CFContainsStrings",
            Self::ZoneNames => "CFZoneNames",
            Self::RecipientEmails => "RecipientEmails",
            Self::ReturnToAddress => "SESReturnToAddr",
            Self::SubjectText => "SESSubjectText",
        }
    }

    /// Environment variable consulted when the field is empty
    #[must_use]
    pub const fn env_key(self) -> &'static str {
        match self {
            Self::Credential => "CF_API_TOKEN",
            Self::ContainsStrings => "CF_CONTAINS_STRINGS",
            Self::ZoneNames => "CF_ZONE_NAMES",
            Self::RecipientEmails => "RECIPIENT_EMAILS",
            Self::ReturnToAddress => "SES_RETURN_TO_ADDR",
            Self::SubjectText => "SES_SUBJECT_TEXT",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Credential => "credential",
            Self::ContainsStrings => "containsStrings",
            Self::ZoneNames => "zoneNames",
            Self::RecipientEmails => "recipientEmails",
            Self::ReturnToAddress => "returnToAddress",
            Self::SubjectText => "subjectText",
        };
        f.write_str(name)
    }
}

/// An alert failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("required field {field} ({}) is missing", .field.config_key())]
pub struct ValidationError {
    /// The first missing field encountered
    pub field: RequiredField,
}

impl ValidationError {
    /// Create an error for the given field
    #[must_use]
    pub const fn new(field: RequiredField) -> Self {
        Self { field }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_messages() {
        let err = ScanError::zone_lookup(
            "example.com",
            ScanError::NotFound {
                resource: "zone example.com".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "error getting zone example.com: resource not found: zone example.com"
        );
        assert!(err.is_provider_error());
        assert_eq!(err.zone(), Some("example.com"));

        let err = ScanError::record_listing("example.com", ScanError::Unauthorized);
        assert_eq!(
            err.to_string(),
            "error getting records for zone example.com: authentication failed: invalid API token"
        );
    }

    #[test]
    fn test_delivery_batch_message() {
        let err = ScanError::DeliveryBatch {
            sender: "noreply@example.com".to_string(),
            recipients: vec!["a@x".to_string(), "c@x".to_string()],
            last_error: "mailbox unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error sending Cloudflare scanner email from \"noreply@example.com\" to \"a@x, c@x\": mailbox unavailable"
        );
    }

    #[test]
    fn test_validation_error_mentions_required() {
        let err = ValidationError::new(RequiredField::Credential);
        let msg = err.to_string();
        assert!(msg.contains("required"));
        assert!(msg.contains("credential"));
        assert!(msg.contains("CFApiToken"));
    }

    #[test]
    fn test_only_config_load_is_fatal() {
        assert!(ScanError::ConfigLoad("boom".into()).is_fatal());
        assert!(!ScanError::Validation(ValidationError::new(RequiredField::ZoneNames)).is_fatal());
        assert!(!ScanError::Unauthorized.is_fatal());
    }
}
