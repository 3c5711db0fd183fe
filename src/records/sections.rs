//! Splitting extracted text into named sections.

use crate::error::{Error, Result};

/// Heading that opens the facilities section.
pub const FACILITIES_MARKER: &str = "Hospital Facilities (Major Cities)";
/// Heading that opens the citizens section.
pub const CITIZENS_MARKER: &str = "Example User Profiles (Sehat Card Data)";
/// Heading that opens the rules section; may be absent.
pub const RULES_MARKER: &str = "Note:";

/// Literal headings used to split the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMarkers {
    /// Required heading before the facilities list
    pub facilities: String,
    /// Required heading before the citizen profiles
    pub citizens: String,
    /// Optional heading before the rules text
    pub rules: String,
}

impl SectionMarkers {
    /// Build markers from the three headings.
    pub fn new(
        facilities: impl Into<String>,
        citizens: impl Into<String>,
        rules: impl Into<String>,
    ) -> Self {
        Self {
            facilities: facilities.into(),
            citizens: citizens.into(),
            rules: rules.into(),
        }
    }

    /// Reject empty headings, which would match at every position.
    pub fn validate(&self) -> Result<()> {
        for (name, marker) in [
            ("facilities", &self.facilities),
            ("citizens", &self.citizens),
            ("rules", &self.rules),
        ] {
            if marker.trim().is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "{} section marker must not be empty",
                    name
                )));
            }
        }
        Ok(())
    }
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self::new(FACILITIES_MARKER, CITIZENS_MARKER, RULES_MARKER)
    }
}

/// The three sections of a document, borrowed from the extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections<'a> {
    /// Text between the facilities and citizens headings
    pub facilities: &'a str,
    /// Text after the citizens heading, up to the rules heading if any
    pub citizens: &'a str,
    /// Text after the rules heading; empty when the heading is absent
    pub rules: &'a str,
}

/// Split `text` at the first occurrence of each heading.
///
/// The citizens heading must follow the facilities heading; the rules
/// heading is searched for only after the citizens heading.
pub fn split_sections<'a>(text: &'a str, markers: &SectionMarkers) -> Result<Sections<'a>> {
    let start = text
        .find(&markers.facilities)
        .ok_or_else(|| Error::missing_marker(&markers.facilities))?;
    let after_facilities = &text[start + markers.facilities.len()..];

    let split = after_facilities
        .find(&markers.citizens)
        .ok_or_else(|| Error::missing_marker(&markers.citizens))?;
    let facilities = &after_facilities[..split];
    let remainder = &after_facilities[split + markers.citizens.len()..];

    let (citizens, rules) = match remainder.find(&markers.rules) {
        Some(pos) => (&remainder[..pos], &remainder[pos + markers.rules.len()..]),
        None => (remainder, ""),
    };

    Ok(Sections {
        facilities,
        citizens,
        rules,
    })
}
