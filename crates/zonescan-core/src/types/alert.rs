use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ScanError};

/// Character set used for outgoing mail when neither the alert nor the scanner sets one
pub const DEFAULT_CHAR_SET: &str = "UTF-8";

/// One scan-and-notify policy.
///
/// Field names on the wire follow the scanner's JSON configuration format.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Display identifier used in logs
    #[serde(rename = "Title")]
    pub title: String,

    /// Bearer token for the DNS provider. Never logged.
    #[serde(rename = "CFApiToken")]
    pub provider_credential: String,

    /// Zones to scan, in order
    #[serde(rename = "CFZoneNames")]
    pub zone_names: Vec<String>,

    /// Substrings to look for in record names
    #[serde(rename = "CFContainsStrings")]
    pub contains_strings: Vec<String>,

    /// Character set for the report; falls back to the scanner default
    #[serde(rename = "SESCharSet", default)]
    pub char_set: String,

    /// Sender address; falls back to the scanner default
    #[serde(rename = "SESReturnToAddr", default)]
    pub return_to_address: String,

    /// Subject line of the success report
    #[serde(rename = "SESSubjectText")]
    pub subject_text: String,

    /// Report recipients, in send order
    #[serde(rename = "RecipientEmails")]
    pub recipient_emails: Vec<String>,
}

impl Alert {
    /// Create an alert with the given title and every other field empty
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the provider credential
    #[must_use]
    pub fn with_credential(mut self, token: impl Into<String>) -> Self {
        self.provider_credential = token.into();
        self
    }

    /// Set the zones to scan
    #[must_use]
    pub fn with_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zone_names = zones.into_iter().map(Into::into).collect();
        self
    }

    /// Set the substrings to match
    #[must_use]
    pub fn with_contains<I, S>(mut self, strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contains_strings = strings.into_iter().map(Into::into).collect();
        self
    }

    /// Set the recipients
    #[must_use]
    pub fn with_recipients<I, S>(mut self, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipient_emails = recipients.into_iter().map(Into::into).collect();
        self
    }

    /// Set the sender address
    #[must_use]
    pub fn with_return_to(mut self, address: impl Into<String>) -> Self {
        self.return_to_address = address.into();
        self
    }

    /// Set the report subject
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject_text = subject.into();
        self
    }

    /// Set the character set
    #[must_use]
    pub fn with_char_set(mut self, char_set: impl Into<String>) -> Self {
        self.char_set = char_set.into();
        self
    }

    /// Substrings with surrounding whitespace removed, in configured order
    pub fn trimmed_contains(&self) -> impl Iterator<Item = &str> {
        self.contains_strings.iter().map(|s| s.trim())
    }
}

impl fmt::Debug for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alert")
            .field("title", &self.title)
            .field("provider_credential", &"<redacted>")
            .field("zone_names", &self.zone_names)
            .field("contains_strings", &self.contains_strings)
            .field("char_set", &self.char_set)
            .field("return_to_address", &self.return_to_address)
            .field("subject_text", &self.subject_text)
            .field("recipient_emails", &self.recipient_emails)
            .finish()
    }
}

/// Scanner-wide settings shared by every alert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Character set applied to alerts that don't set one
    #[serde(rename = "SESCharSet", default)]
    pub default_char_set: String,

    /// Sender address applied to alerts that don't set one
    #[serde(rename = "SESReturnToAddr", default)]
    pub default_return_to_address: String,

    /// Alerts to run, in order
    #[serde(rename = "Alerts")]
    pub alerts: Vec<Alert>,
}

impl ScannerConfig {
    /// Decode a configuration blob in the scanner's JSON format
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| ScanError::ConfigLoad(e.to_string()))
    }

    /// Shared defaults for [`crate::validate`]
    #[must_use]
    pub fn defaults(&self) -> Defaults {
        Defaults {
            char_set: self.default_char_set.clone(),
            return_to_address: self.default_return_to_address.clone(),
        }
    }
}

/// Fallback values applied to alerts during validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    /// Fallback character set
    pub char_set: String,
    /// Fallback sender address
    pub return_to_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "SESCharSet": "UTF-8",
        "SESReturnToAddr": "noreply@example.com",
        "Alerts": [
            {
                "Title": "decommissioned hosts",
                "CFApiToken": "secret-token",
                "CFZoneNames": ["example.com", "example.org"],
                "CFContainsStrings": [" staging", "old "],
                "SESSubjectText": "Stale DNS records",
                "RecipientEmails": ["ops@example.com"]
            }
        ]
    }"#;

    #[test]
    fn test_decode_config() {
        let config = ScannerConfig::from_json_slice(CONFIG.as_bytes()).unwrap();
        assert_eq!(config.default_return_to_address, "noreply@example.com");
        assert_eq!(config.alerts.len(), 1);

        let alert = &config.alerts[0];
        assert_eq!(alert.title, "decommissioned hosts");
        assert_eq!(alert.zone_names, vec!["example.com", "example.org"]);
        assert!(alert.char_set.is_empty());
        assert!(alert.return_to_address.is_empty());
    }

    #[test]
    fn test_missing_alerts_is_load_error() {
        let err = ScannerConfig::from_json_slice(br#"{"SESCharSet": "UTF-8"}"#).unwrap_err();
        assert!(matches!(err, ScanError::ConfigLoad(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_missing_nested_field_is_load_error() {
        let json = br#"{"Alerts": [{"Title": "t", "CFApiToken": "x"}]}"#;
        let err = ScannerConfig::from_json_slice(json).unwrap_err();
        assert!(matches!(err, ScanError::ConfigLoad(_)));
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = ScannerConfig::from_json_slice(CONFIG.as_bytes()).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_trimmed_contains() {
        let alert = Alert::new("t").with_contains([" staging", "old ", "  dev  "]);
        let trimmed: Vec<&str> = alert.trimmed_contains().collect();
        assert_eq!(trimmed, vec!["staging", "old", "dev"]);
    }
}
