//! Alert defaulting and required-field checks.
//!
//! Every alert goes through [`validate`] before any network call is made.
//! Empty fields are filled from the scanner defaults and then from a
//! [`FieldSource`] (the process environment in production). The first field
//! that is still empty, in [`RequiredField::ALL`] order, is reported.

use std::collections::HashMap;

use crate::error::{RequiredField, ValidationError};
use crate::types::{Alert, Defaults, DEFAULT_CHAR_SET};

/// Environment variable consulted for an empty character set
pub const CHAR_SET_ENV_KEY: &str = "SES_CHAR_SET";

/// A lookup for values that fill empty alert fields
pub trait FieldSource {
    /// Look up a raw value. Empty values count as absent.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads fallback values from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl FieldSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// Never supplies a value
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl FieldSource for NoFallback {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}

impl<S: std::hash::BuildHasher> FieldSource for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Split a comma-delimited value, trimming each segment and dropping empty ones
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Apply defaults to `alert` and check its required fields.
///
/// Checks run in a fixed order (credential, contains strings, zone names,
/// recipients, sender, subject) and the first field still empty after
/// defaulting is returned as the error. The character set never fails: it
/// falls back to the scanner default, then the source, then `UTF-8`.
pub fn validate(
    mut alert: Alert,
    defaults: &Defaults,
    source: &dyn FieldSource,
) -> Result<Alert, ValidationError> {
    fill_scalar(&mut alert.provider_credential, RequiredField::Credential, source)?;
    fill_list(&mut alert.contains_strings, RequiredField::ContainsStrings, source)?;
    fill_list(&mut alert.zone_names, RequiredField::ZoneNames, source)?;
    fill_list(&mut alert.recipient_emails, RequiredField::RecipientEmails, source)?;

    if alert.return_to_address.is_empty() {
        alert.return_to_address.clone_from(&defaults.return_to_address);
    }
    fill_scalar(&mut alert.return_to_address, RequiredField::ReturnToAddress, source)?;
    fill_scalar(&mut alert.subject_text, RequiredField::SubjectText, source)?;

    if alert.char_set.is_empty() {
        alert.char_set = if defaults.char_set.is_empty() {
            source
                .lookup(CHAR_SET_ENV_KEY)
                .unwrap_or_else(|| DEFAULT_CHAR_SET.to_string())
        } else {
            defaults.char_set.clone()
        };
    }

    Ok(alert)
}

fn fill_scalar(
    value: &mut String,
    field: RequiredField,
    source: &dyn FieldSource,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        *value = source
            .lookup(field.env_key())
            .ok_or(ValidationError::new(field))?;
    }
    Ok(())
}

fn fill_list(
    values: &mut Vec<String>,
    field: RequiredField,
    source: &dyn FieldSource,
) -> Result<(), ValidationError> {
    if values.is_empty() {
        *values = source
            .lookup(field.env_key())
            .map(|v| split_list(&v))
            .unwrap_or_default();
    }
    if values.is_empty() {
        return Err(ValidationError::new(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_alert() -> Alert {
        Alert::new("stale records")
            .with_credential("token")
            .with_zones(["example.com"])
            .with_contains(["staging"])
            .with_recipients(["ops@example.com"])
            .with_return_to("noreply@example.com")
            .with_subject("Stale DNS records")
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_complete_alert_gets_default_char_set() {
        let alert = validate(complete_alert(), &Defaults::default(), &NoFallback).unwrap();
        assert_eq!(alert.char_set, DEFAULT_CHAR_SET);
    }

    #[test]
    fn test_scanner_defaults_apply() {
        let defaults = Defaults {
            char_set: "ISO-8859-1".to_string(),
            return_to_address: "scanner@example.com".to_string(),
        };
        let alert = complete_alert().with_return_to("");
        let alert = validate(alert, &defaults, &NoFallback).unwrap();
        assert_eq!(alert.char_set, "ISO-8859-1");
        assert_eq!(alert.return_to_address, "scanner@example.com");
    }

    #[test]
    fn test_alert_values_win_over_defaults() {
        let defaults = Defaults {
            char_set: "ISO-8859-1".to_string(),
            return_to_address: "scanner@example.com".to_string(),
        };
        let alert = complete_alert().with_char_set("UTF-16");
        let alert = validate(alert, &defaults, &NoFallback).unwrap();
        assert_eq!(alert.char_set, "UTF-16");
        assert_eq!(alert.return_to_address, "noreply@example.com");
    }

    #[test]
    fn test_credential_reported_first() {
        let alert = Alert::new("only a title");
        let err = validate(alert, &Defaults::default(), &NoFallback).unwrap_err();
        assert_eq!(err.field, RequiredField::Credential);
    }

    #[test]
    fn test_check_order() {
        let mut alert = Alert::new("t");

        // Fill one field at a time and watch the reported field advance.
        for field in RequiredField::ALL {
            let err = validate(alert.clone(), &Defaults::default(), &NoFallback).unwrap_err();
            assert_eq!(err.field, field);

            alert = match field {
                RequiredField::Credential => alert.with_credential("token"),
                RequiredField::ContainsStrings => alert.with_contains(["staging"]),
                RequiredField::ZoneNames => alert.with_zones(["example.com"]),
                RequiredField::RecipientEmails => alert.with_recipients(["ops@example.com"]),
                RequiredField::ReturnToAddress => alert.with_return_to("noreply@example.com"),
                RequiredField::SubjectText => alert.with_subject("subject"),
            };
        }

        assert!(validate(alert, &Defaults::default(), &NoFallback).is_ok());
    }

    #[test]
    fn test_fills_from_source() {
        let source = env(&[
            ("CF_API_TOKEN", "env-token"),
            ("CF_CONTAINS_STRINGS", " staging , old,, "),
            ("CF_ZONE_NAMES", "example.com,example.org"),
            ("RECIPIENT_EMAILS", "a@example.com, b@example.com"),
            ("SES_RETURN_TO_ADDR", "env@example.com"),
            ("SES_SUBJECT_TEXT", "From env"),
            ("SES_CHAR_SET", "US-ASCII"),
        ]);

        let alert = validate(Alert::new("env"), &Defaults::default(), &source).unwrap();
        assert_eq!(alert.provider_credential, "env-token");
        assert_eq!(alert.contains_strings, vec!["staging", "old"]);
        assert_eq!(alert.zone_names, vec!["example.com", "example.org"]);
        assert_eq!(alert.recipient_emails, vec!["a@example.com", "b@example.com"]);
        assert_eq!(alert.return_to_address, "env@example.com");
        assert_eq!(alert.subject_text, "From env");
        assert_eq!(alert.char_set, "US-ASCII");
    }

    #[test]
    fn test_source_does_not_override_configured_values() {
        let source = env(&[("CF_API_TOKEN", "env-token"), ("CF_ZONE_NAMES", "other.com")]);
        let alert = validate(complete_alert(), &Defaults::default(), &source).unwrap();
        assert_eq!(alert.provider_credential, "token");
        assert_eq!(alert.zone_names, vec!["example.com"]);
    }

    #[test]
    fn test_blank_source_value_is_missing() {
        let source = env(&[("CF_ZONE_NAMES", " , ,")]);
        let alert = Alert {
            zone_names: Vec::new(),
            ..complete_alert()
        };
        let err = validate(alert, &Defaults::default(), &source).unwrap_err();
        assert_eq!(err.field, RequiredField::ZoneNames);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b ,c"), vec!["a", "b", "c"]);
        assert!(split_list(" , ").is_empty());
    }
}
