//! Record name matching.

use crate::types::ZoneRecord;

/// Describe every record whose name contains `substring`.
///
/// Matching is a case-sensitive literal containment test. Records with an
/// empty name never match; an empty substring matches every other record.
/// Output keeps the input order.
#[must_use]
pub fn filter_records(records: &[ZoneRecord], substring: &str) -> Vec<String> {
    records
        .iter()
        .filter(|r| !r.name.is_empty() && r.name.contains(substring))
        .map(ZoneRecord::describe)
        .collect()
}
