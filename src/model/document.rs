//! Document-level types.

use super::{CitizenRecord, FacilityRecord, RuleRecord};
use serde::{Deserialize, Serialize};

/// The three record collections recovered from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SehatDocument {
    /// Citizen profiles, in document order
    pub citizens: Vec<CitizenRecord>,

    /// Facilities, in document order
    pub facilities: Vec<FacilityRecord>,

    /// Rule sentences, in document order
    #[serde(rename = "sehat_card_rules")]
    pub rules: Vec<RuleRecord>,
}

impl SehatDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all collections.
    pub fn record_count(&self) -> usize {
        self.citizens.len() + self.facilities.len() + self.rules.len()
    }

    /// Whether no record was recovered.
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let doc = SehatDocument::new();
        assert!(doc.is_empty());
        assert_eq!(doc.record_count(), 0);
    }

    #[test]
    fn test_rules_key_in_json() {
        let mut doc = SehatDocument::new();
        doc.rules.push(RuleRecord::new(1, "Renew yearly."));
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"sehat_card_rules\""));
    }
}
