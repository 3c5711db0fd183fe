//! Extraction statistics.

use serde::{Deserialize, Serialize};

use crate::model::SehatDocument;

/// Counters collected while extracting text and parsing records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Stream objects located in the raw document
    pub streams_found: usize,

    /// Streams that inflated successfully
    pub streams_decoded: usize,

    /// Streams skipped because they did not inflate
    pub streams_skipped: usize,

    /// ToUnicode tables built
    pub encoding_tables: usize,

    /// Mappings across all tables
    pub encoding_entries: usize,

    /// CMap lines skipped as malformed
    pub malformed_entries: usize,

    /// Text fragments recovered from content streams
    pub fragments: usize,

    /// Characters in the assembled text (excluding whitespace)
    pub char_count: usize,

    /// Facility records produced
    pub facility_count: usize,

    /// Citizen records produced
    pub citizen_count: usize,

    /// Rule records produced
    pub rule_count: usize,

    /// Citizen blocks dropped for not matching the field template
    pub discarded_citizen_blocks: usize,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the character count of assembled text.
    pub fn count_text(&mut self, text: &str) {
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count();
    }

    /// Record the collection sizes of a parsed document.
    pub fn count_records(&mut self, doc: &SehatDocument) {
        self.facility_count = doc.facilities.len();
        self.citizen_count = doc.citizens.len();
        self.rule_count = doc.rules.len();
    }

    /// Total records across the three collections.
    pub fn record_count(&self) -> usize {
        self.facility_count + self.citizen_count + self.rule_count
    }
}
