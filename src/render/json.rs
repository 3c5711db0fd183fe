//! JSON rendering of the three record collections.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::SehatDocument;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with two-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// One of the three output collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Citizens,
    Facilities,
    Rules,
}

impl Collection {
    /// Every collection, in output order.
    pub const ALL: [Collection; 3] = [Collection::Citizens, Collection::Facilities, Collection::Rules];

    /// The single key of this collection's JSON document.
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Citizens => "citizens",
            Collection::Facilities => "facilities",
            Collection::Rules => "sehat_card_rules",
        }
    }

    /// File name used when writing the collection to a directory.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.key())
    }

    /// Look up a collection by its key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// `{"<key>": [...]}` without going through a sorted map.
struct Keyed<'a, T> {
    key: &'static str,
    records: &'a [T],
}

impl<T: Serialize> Serialize for Keyed<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key, self.records)?;
        map.end()
    }
}

fn render<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Render one collection as its own JSON document.
pub fn collection_to_json(
    doc: &SehatDocument,
    collection: Collection,
    format: JsonFormat,
) -> Result<String> {
    let key = collection.key();
    match collection {
        Collection::Citizens => render(&Keyed { key, records: &doc.citizens }, format),
        Collection::Facilities => render(&Keyed { key, records: &doc.facilities }, format),
        Collection::Rules => render(&Keyed { key, records: &doc.rules }, format),
    }
}

/// Render the three documents separately, in output order.
pub fn to_json_documents(doc: &SehatDocument, format: JsonFormat) -> Result<Vec<(Collection, String)>> {
    Collection::ALL
        .into_iter()
        .map(|c| collection_to_json(doc, c, format).map(|json| (c, json)))
        .collect()
}

/// Render the three documents, citizens then facilities then rules, one
/// per line group.
pub fn to_json(doc: &SehatDocument, format: JsonFormat) -> Result<String> {
    let documents = to_json_documents(doc, format)?;
    Ok(documents
        .into_iter()
        .map(|(_, json)| json)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CitizenRecord, FacilityRecord, FacilityType, RuleRecord};

    fn sample() -> SehatDocument {
        let mut doc = SehatDocument::new();
        doc.facilities.push(FacilityRecord {
            id: "karachi_city_hospital".to_string(),
            name: "City Hospital".to_string(),
            facility_type: FacilityType::Hospital,
            city: "Karachi".to_string(),
            address: "12 Main Road".to_string(),
            urdu_name: Some("شہر ہسپتال".to_string()),
        });
        doc.citizens.push(CitizenRecord {
            name: "Ali".to_string(),
            ..Default::default()
        });
        doc.rules.push(RuleRecord::new(1, "Renew yearly."));
        doc
    }

    #[test]
    fn test_to_json_order_and_keys() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        let lines: Vec<_> = json.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(r#"{"citizens":[{"name":"Ali","#));
        assert!(lines[1].starts_with(r#"{"facilities":[{"id":"karachi_city_hospital""#));
        assert_eq!(
            lines[2],
            r#"{"sehat_card_rules":[{"id":"rule_1","description":"Renew yearly."}]}"#
        );
    }

    #[test]
    fn test_pretty_keeps_non_ascii() {
        let json = collection_to_json(&sample(), Collection::Facilities, JsonFormat::Pretty).unwrap();
        assert!(json.contains("شہر ہسپتال"));
        assert!(!json.contains("\\u"));
        assert!(json.starts_with("{\n  \"facilities\": [\n    {\n      \"id\""));
    }

    #[test]
    fn test_empty_collections() {
        let json = to_json(&SehatDocument::new(), JsonFormat::Pretty).unwrap();
        assert_eq!(
            json,
            "{\n  \"citizens\": []\n}\n{\n  \"facilities\": []\n}\n{\n  \"sehat_card_rules\": []\n}"
        );
    }

    #[test]
    fn test_collection_keys() {
        assert_eq!(Collection::from_key("sehat_card_rules"), Some(Collection::Rules));
        assert_eq!(Collection::from_key("rules"), None);
        assert_eq!(Collection::Citizens.file_name(), "citizens.json");
    }
}
