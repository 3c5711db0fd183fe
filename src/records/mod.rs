//! Record parsing: section splitting and the facility, citizen and rule
//! parsers.

mod citizen;
mod facility;
mod rule;
mod sections;

pub use citizen::{CitizenParse, CitizenParser, CITIZEN_FIELDS, LINE_BREAK};
pub use facility::{facility_id, slugify, FacilityParser, DEFAULT_CITIES};
pub use rule::parse_rules;
pub use sections::{
    split_sections, SectionMarkers, Sections, CITIZENS_MARKER, FACILITIES_MARKER, RULES_MARKER,
};

use crate::error::Result;
use crate::model::SehatDocument;
use crate::parser::ParseOptions;
use crate::render::ExtractionStats;

/// Collapse every run of whitespace to a single space and trim both ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turns extracted text into the three record collections.
#[derive(Debug, Clone)]
pub struct RecordParser {
    markers: SectionMarkers,
    facilities: FacilityParser,
    citizens: CitizenParser,
}

impl RecordParser {
    /// Build a parser from options, rejecting unusable markers.
    pub fn new(options: &ParseOptions) -> Result<Self> {
        options.markers.validate()?;
        Ok(Self {
            markers: options.markers.clone(),
            facilities: FacilityParser::new(options.cities.iter().cloned()),
            citizens: CitizenParser::new(),
        })
    }

    /// Split `text` into sections and parse each one.
    ///
    /// Fails only when a required section heading is missing.
    pub fn parse(&self, text: &str, stats: &mut ExtractionStats) -> Result<SehatDocument> {
        let sections = split_sections(text, &self.markers)?;

        let citizens = self.citizens.parse(sections.citizens);
        stats.discarded_citizen_blocks += citizens.discarded_blocks;

        let doc = SehatDocument {
            citizens: citizens.records,
            facilities: self.facilities.parse(sections.facilities),
            rules: parse_rules(sections.rules),
        };
        stats.count_records(&doc);

        log::debug!(
            "Parsed {} facilities, {} citizens, {} rules",
            doc.facilities.len(),
            doc.citizens.len(),
            doc.rules.len()
        );
        Ok(doc)
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self {
            markers: SectionMarkers::default(),
            facilities: FacilityParser::default(),
            citizens: CitizenParser::default(),
        }
    }
}
