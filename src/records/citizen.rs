//! Citizen profile parsing.
//!
//! Each profile is eight labeled fields in a fixed order, consecutive fields
//! separated by a literal `<br>`:
//!
//! ```text
//! Name: ... <br> Father's Name: ... <br> CNIC: ... <br> City: ... <br>
//! Income Group: ... <br> Eligibility Status: ... <br> Past Diseases: ... <br>
//! Remaining Credits: ...
//! ```
//!
//! Parsing is a state machine over the label sequence. A block that breaks
//! the order, lacks a separator or carries a malformed CNIC is discarded as a
//! whole; no partial record is produced.

use regex::Regex;

use super::normalize_whitespace;
use crate::model::CitizenRecord;

/// Field labels in template order.
pub const CITIZEN_FIELDS: [&str; FIELD_COUNT] = [
    "Name",
    "Father's Name",
    "CNIC",
    "City",
    "Income Group",
    "Eligibility Status",
    "Past Diseases",
    "Remaining Credits",
];

/// Separator between consecutive fields of one profile.
pub const LINE_BREAK: &str = "<br>";

const FIELD_COUNT: usize = 8;
const CNIC_INDEX: usize = 2;

/// Any field label followed by a colon. "Father's Name" precedes "Name" so
/// the longer label wins at the same position.
const LABEL_PATTERN: &str = r"\b(Father['\x{2019}]s Name|Name|CNIC|City|Income Group|Eligibility Status|Past Diseases|Remaining Credits)\s*:";

/// Outcome of parsing a citizens section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitizenParse {
    /// Complete profiles, in document order
    pub records: Vec<CitizenRecord>,
    /// Blocks dropped because they did not match the template
    pub discarded_blocks: usize,
}

/// Template-driven parser for citizen profiles.
#[derive(Debug, Clone)]
pub struct CitizenParser {
    label: Regex,
}

/// A label occurrence and the raw text up to the next label.
#[derive(Debug, Clone, Copy)]
struct Field<'a> {
    index: usize,
    raw: &'a str,
}

impl Field<'_> {
    /// The normalized value, or `None` if the field breaks the template.
    fn value(&self) -> Option<String> {
        let raw = self.raw.trim();
        let raw = match raw.strip_suffix(LINE_BREAK) {
            Some(value) => value,
            None if self.index + 1 == FIELD_COUNT => raw,
            None => return None,
        };

        let value = normalize_whitespace(raw);
        if self.index == CNIC_INDEX && !is_cnic(&value) {
            return None;
        }
        Some(value)
    }
}

impl CitizenParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self {
            label: Regex::new(LABEL_PATTERN).expect("citizen label pattern is valid"),
        }
    }

    /// Parse every profile block in `section`.
    pub fn parse(&self, section: &str) -> CitizenParse {
        let mut outcome = CitizenParse::default();
        let mut values: Vec<String> = Vec::with_capacity(FIELD_COUNT);
        let mut skipping = false;

        for field in self.fields(section) {
            if field.index == values.len() {
                if let Some(value) = field.value() {
                    skipping = false;
                    values.push(value);
                    if values.len() == FIELD_COUNT {
                        outcome.records.push(finish(&mut values));
                    }
                    continue;
                }
            }

            if !values.is_empty() || !skipping {
                log::debug!(
                    "Discarding citizen block at field {:?} (after {} fields)",
                    CITIZEN_FIELDS[field.index],
                    values.len()
                );
                outcome.discarded_blocks += 1;
            }
            values.clear();
            skipping = true;

            // A misplaced "Name" still opens the next block.
            if field.index == 0 {
                if let Some(value) = field.value() {
                    values.push(value);
                    skipping = false;
                }
            }
        }

        if !values.is_empty() {
            log::debug!("Discarding trailing citizen block with {} fields", values.len());
            outcome.discarded_blocks += 1;
        }

        outcome
    }

    fn fields<'a>(&self, section: &'a str) -> Vec<Field<'a>> {
        let labels: Vec<(usize, usize, usize)> = self
            .label
            .captures_iter(section)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let index = field_index(caps.get(1)?.as_str())?;
                Some((index, whole.start(), whole.end()))
            })
            .collect();

        labels
            .iter()
            .enumerate()
            .map(|(i, &(index, _, end))| {
                let stop = labels.get(i + 1).map_or(section.len(), |next| next.1);
                Field {
                    index,
                    raw: &section[end..stop],
                }
            })
            .collect()
    }
}

impl Default for CitizenParser {
    fn default() -> Self {
        Self::new()
    }
}

fn finish(values: &mut Vec<String>) -> CitizenRecord {
    let mut fields: [String; FIELD_COUNT] = Default::default();
    for (slot, value) in fields.iter_mut().zip(values.drain(..)) {
        *slot = value;
    }
    CitizenRecord::from_fields(fields)
}

fn field_index(label: &str) -> Option<usize> {
    if label.starts_with("Father") {
        return Some(1);
    }
    CITIZEN_FIELDS.iter().position(|f| *f == label)
}

fn is_cnic(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(name: &str, cnic: &str) -> String {
        format!(
            "Name: {name}<br>Father's Name: Father of {name}<br>CNIC: {cnic}<br>City: Karachi<br>\
             Income Group: Low<br>Eligibility Status: Eligible<br>Past Diseases: None<br>\
             Remaining Credits: 50,000 PKR\n"
        )
    }

    #[test]
    fn test_two_blocks_in_order() {
        let section = format!("{}{}", block("Ali Khan", "42101-1234567-1"), block("Sara", "35202-7654321-2"));
        let outcome = CitizenParser::new().parse(&section);
        assert_eq!(outcome.discarded_blocks, 0);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].name, "Ali Khan");
        assert_eq!(outcome.records[0].father_name, "Father of Ali Khan");
        assert_eq!(outcome.records[0].cnic, "42101-1234567-1");
        assert_eq!(outcome.records[0].remaining_credits, "50,000 PKR");
        assert_eq!(outcome.records[1].name, "Sara");
    }

    #[test]
    fn test_block_missing_field_is_discarded() {
        let broken = block("Bilal", "61101-0000000-3").replace("City: Karachi<br>", "");
        let section = format!("{}{}", broken, block("Hina", "37405-1111111-4"));
        let outcome = CitizenParser::new().parse(&section);
        assert_eq!(outcome.discarded_blocks, 1);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].name, "Hina");
    }

    #[test]
    fn test_values_are_whitespace_normalized() {
        let section = "Name\n:\n  Ayesha \n Bibi <br>\nFather's Name : Abdul\n<br>\nCNIC: 12345-1234567-8<br>\
                       City:\tLahore<br>Income Group: Middle<br>Eligibility Status: Not   Eligible<br>\
                       Past Diseases: Diabetes,\nHypertension<br>Remaining Credits: 0<br>";
        let outcome = CitizenParser::new().parse(section);
        assert_eq!(outcome.records.len(), 1);
        let record = &outcome.records[0];
        assert_eq!(record.name, "Ayesha Bibi");
        assert_eq!(record.father_name, "Abdul");
        assert_eq!(record.city, "Lahore");
        assert_eq!(record.eligibility_status, "Not Eligible");
        assert_eq!(record.past_diseases, "Diabetes, Hypertension");
        assert_eq!(record.remaining_credits, "0");
    }

    #[test]
    fn test_missing_separator_discards_block() {
        let section = block("Usman", "1-2").replace("<br>City", " City");
        let outcome = CitizenParser::new().parse(&section);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.discarded_blocks, 1);
    }

    #[test]
    fn test_non_numeric_cnic_discards_block() {
        let outcome = CitizenParser::new().parse(&block("Zara", "unknown"));
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.discarded_blocks, 1);
    }

    #[test]
    fn test_curly_apostrophe_label() {
        let section = block("Omar", "1-1").replace("Father's", "Father\u{2019}s");
        let outcome = CitizenParser::new().parse(&section);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].father_name, "Father of Omar");
    }

    #[test]
    fn test_truncated_final_block_is_discarded() {
        let section = format!("{}Name: Late<br>Father's Name: X<br>", block("First", "9-9"));
        let outcome = CitizenParser::new().parse(&section);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.discarded_blocks, 1);
    }

    #[test]
    fn test_text_before_first_label_is_ignored() {
        let section = format!("Sample profiles follow.\n{}", block("Nadia", "4-4"));
        let outcome = CitizenParser::new().parse(&section);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.discarded_blocks, 0);
    }

    #[test]
    fn test_empty_section() {
        let outcome = CitizenParser::new().parse("");
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.discarded_blocks, 0);
    }
}
