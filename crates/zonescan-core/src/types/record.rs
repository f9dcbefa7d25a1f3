use serde::{Deserialize, Serialize};

/// A DNS record as seen by the scanner.
///
/// Only the name and content matter for matching; provider-specific fields
/// are dropped on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRecord {
    /// Fully qualified record name (may be empty)
    #[serde(default)]
    pub name: String,

    /// Record content (address, target, text...)
    #[serde(default)]
    pub content: String,
}

impl ZoneRecord {
    /// Create a record from its name and content
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// The line used for this record in reports: `"<name> ... <content>"`
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} ... {}", self.name, self.content)
    }
}
