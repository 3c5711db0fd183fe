//! Facility list parsing.
//!
//! The facilities section is a sequence of city headings, each followed by
//! lines of the form `Name (Urdu name) – Address.`

use crate::model::{FacilityRecord, FacilityType};

/// Cities recognized as headings unless overridden.
pub const DEFAULT_CITIES: [&str; 5] = ["Karachi", "Lahore", "Islamabad", "Peshawar", "Quetta"];

/// Separates a facility name from its address.
const NAME_ADDRESS_SEPARATOR: &str = " \u{2013} ";

/// Lines carrying a bullet are descriptive notes, not listings.
const BULLET: char = '\u{2022}';

/// Line-oriented parser with a current-city context.
#[derive(Debug, Clone)]
pub struct FacilityParser {
    cities: Vec<String>,
}

impl FacilityParser {
    /// Create a parser that recognizes `cities` as headings.
    pub fn new<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cities: cities.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse every listing in `section`, in order.
    pub fn parse(&self, section: &str) -> Vec<FacilityRecord> {
        let mut records = Vec::new();
        let mut current_city: Option<&str> = None;

        for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if let Some(city) = self.cities.iter().find(|c| c.as_str() == line) {
                current_city = Some(city.as_str());
                continue;
            }

            let Some(city) = current_city else {
                continue;
            };
            if line.contains(BULLET) {
                continue;
            }
            let Some((name_part, address_part)) = line.split_once(NAME_ADDRESS_SEPARATOR) else {
                continue;
            };

            records.push(build_record(city, name_part, address_part));
        }

        records
    }
}

impl Default for FacilityParser {
    fn default() -> Self {
        Self::new(DEFAULT_CITIES)
    }
}

fn build_record(city: &str, name_part: &str, address_part: &str) -> FacilityRecord {
    let name = trim_listing(name_part);
    let address = trim_listing(address_part);
    let (name, urdu_name) = split_alternate_name(name);

    FacilityRecord {
        id: facility_id(city, name),
        name: name.to_string(),
        facility_type: FacilityType::from_name(name),
        city: city.to_string(),
        address: address.to_string(),
        urdu_name,
    }
}

fn trim_listing(s: &str) -> &str {
    s.trim_matches(|c: char| c == ' ' || c == '.')
}

/// `Name (alternate)` becomes `("Name", Some("alternate"))`.
fn split_alternate_name(name: &str) -> (&str, Option<String>) {
    if !name.ends_with(')') {
        return (name, None);
    }
    let Some((base, extra)) = name.split_once('(') else {
        return (name, None);
    };
    let alternate = extra.trim_end_matches(|c: char| c == ')' || c == ' ');
    let alternate = (!alternate.is_empty()).then(|| alternate.to_string());
    (base.trim(), alternate)
}

/// `karachi` + `City Hospital` becomes `karachi_city_hospital`.
pub fn facility_id(city: &str, name: &str) -> String {
    format!("{}_{}", city.to_lowercase().replace(' ', "_"), slugify(name))
}

/// Lowercase, with each run of characters outside `[a-z0-9]` collapsed to
/// one underscore and no underscore at either end.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut gap = false;
    for c in s.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if gap && !slug.is_empty() {
                slug.push('_');
            }
            gap = false;
            slug.push(c);
        } else {
            gap = true;
        }
    }
    slug
}
