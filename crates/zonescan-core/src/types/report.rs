use serde::{Serialize, Serializer};

/// Matches found in a single zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneMatches {
    /// Zone name as configured on the alert
    pub zone: String,

    /// Matched record descriptions, in match order
    pub matches: Vec<String>,
}

/// Matched record descriptions grouped by zone.
///
/// A zone only appears once it has at least one match. Zones keep the order
/// in which they were first appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    zones: Vec<ZoneMatches>,
}

impl ScanResult {
    /// Create an empty result
    #[must_use]
    pub const fn new() -> Self {
        Self { zones: Vec::new() }
    }

    /// Append matches to a zone's entry. Empty batches are ignored.
    pub fn append(&mut self, zone: &str, matches: Vec<String>) {
        if matches.is_empty() {
            return;
        }

        match self.zones.iter_mut().find(|z| z.zone == zone) {
            Some(entry) => entry.matches.extend(matches),
            None => self.zones.push(ZoneMatches {
                zone: zone.to_string(),
                matches,
            }),
        }
    }

    /// Returns true if no zone had a match
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Number of zones with at least one match
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Total number of matched lines across all zones
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.zones.iter().map(|z| z.matches.len()).sum()
    }

    /// Matches for a zone, if it has any
    #[must_use]
    pub fn get(&self, zone: &str) -> Option<&[String]> {
        self.zones
            .iter()
            .find(|z| z.zone == zone)
            .map(|z| z.matches.as_slice())
    }

    /// Iterate over zones with matches
    pub fn iter(&self) -> impl Iterator<Item = &ZoneMatches> {
        self.zones.iter()
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a ZoneMatches;
    type IntoIter = std::slice::Iter<'a, ZoneMatches>;

    fn into_iter(self) -> Self::IntoIter {
        self.zones.iter()
    }
}

// Serialized as a zone -> matches object.
impl Serialize for ScanResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.zones.iter().map(|z| (&z.zone, &z.matches)))
    }
}

/// Result of sending one report to every recipient of an alert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    /// Number of send attempts made
    pub attempted: usize,

    /// Recipients whose send failed, in send order
    pub failed_recipients: Vec<String>,

    /// Message of the most recent failure. Earlier messages are not kept.
    pub last_error: Option<String>,
}

impl DeliveryOutcome {
    /// Record a successful send
    pub fn record_success(&mut self) {
        self.attempted += 1;
    }

    /// Record a failed send, replacing any earlier error message
    pub fn record_failure(&mut self, recipient: &str, error: impl Into<String>) {
        self.attempted += 1;
        self.failed_recipients.push(recipient.to_string());
        self.last_error = Some(error.into());
    }

    /// Returns true if every recipient was reached
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed_recipients.is_empty()
    }

    /// Number of recipients reached
    #[must_use]
    pub fn delivered(&self) -> usize {
        self.attempted - self.failed_recipients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_skips_empty_batches() {
        let mut result = ScanResult::new();
        result.append("example.com", Vec::new());
        assert!(result.is_empty());
        assert_eq!(result.get("example.com"), None);
    }

    #[test]
    fn test_append_extends_existing_zone() {
        let mut result = ScanResult::new();
        result.append("example.com", vec!["a ... 1".into()]);
        result.append("example.org", vec!["b ... 2".into()]);
        result.append("example.com", vec!["a ... 1".into(), "c ... 3".into()]);

        assert_eq!(result.zone_count(), 2);
        assert_eq!(result.match_count(), 4);
        assert_eq!(
            result.get("example.com").unwrap(),
            &["a ... 1", "a ... 1", "c ... 3"]
        );

        let zones: Vec<&str> = result.iter().map(|z| z.zone.as_str()).collect();
        assert_eq!(zones, vec!["example.com", "example.org"]);
    }

    #[test]
    fn test_serialize_as_map() {
        let mut result = ScanResult::new();
        result.append("example.com", vec!["staging.example.com ... 1.2.3.4".into()]);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"example.com":["staging.example.com ... 1.2.3.4"]}"#);
    }

    #[test]
    fn test_delivery_outcome_keeps_last_error() {
        let mut outcome = DeliveryOutcome::default();
        outcome.record_failure("a@x", "first");
        outcome.record_success();
        outcome.record_failure("c@x", "second");

        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.delivered(), 1);
        assert_eq!(outcome.failed_recipients, vec!["a@x", "c@x"]);
        assert_eq!(outcome.last_error.as_deref(), Some("second"));
        assert!(!outcome.is_success());
    }
}
