//! Facility, citizen and rule records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A healthcare facility listed under a city heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRecord {
    /// Slug of city and name (e.g. `karachi_city_hospital`)
    pub id: String,

    /// Facility name without any alternate-script suffix
    pub name: String,

    /// Facility category inferred from the name
    #[serde(rename = "type")]
    pub facility_type: FacilityType,

    /// City heading the facility was listed under
    pub city: String,

    /// Street address
    pub address: String,

    /// Name in Urdu script, when the listing carries one in parentheses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urdu_name: Option<String>,
}

/// Facility category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacilityType {
    /// Name contains "Hospital"
    Hospital,
    /// Name contains "Medical Centre"
    #[serde(rename = "Medical Centre")]
    MedicalCentre,
    /// Name contains "Medical Complex"
    #[serde(rename = "Medical Complex")]
    MedicalComplex,
    /// Anything else
    Facility,
}

impl FacilityType {
    /// Infer the category from a facility name.
    ///
    /// "Medical Centre"/"Medical Complex" take precedence over "Hospital".
    pub fn from_name(name: &str) -> Self {
        if name.contains("Medical Centre") || name.contains("Medical Complex") {
            if name.contains("Centre") {
                FacilityType::MedicalCentre
            } else {
                FacilityType::MedicalComplex
            }
        } else if name.contains("Hospital") {
            FacilityType::Hospital
        } else {
            FacilityType::Facility
        }
    }

    /// Display label, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityType::Hospital => "Hospital",
            FacilityType::MedicalCentre => "Medical Centre",
            FacilityType::MedicalComplex => "Medical Complex",
            FacilityType::Facility => "Facility",
        }
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Sehat Card holder profile. Every value is whitespace-normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitizenRecord {
    pub name: String,
    pub father_name: String,
    pub cnic: String,
    pub city: String,
    pub income_group: String,
    pub eligibility_status: String,
    pub past_diseases: String,
    pub remaining_credits: String,
}

impl CitizenRecord {
    /// Build a record from the eight field values in template order.
    pub fn from_fields(fields: [String; 8]) -> Self {
        let [name, father_name, cnic, city, income_group, eligibility_status, past_diseases, remaining_credits] =
            fields;
        Self {
            name,
            father_name,
            cnic,
            city,
            income_group,
            eligibility_status,
            past_diseases,
            remaining_credits,
        }
    }
}

/// One sentence of the Sehat Card rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    /// Sequential label, `rule_1`, `rule_2`, ...
    pub id: String,
    /// The sentence, whitespace-normalized
    pub description: String,
}

impl RuleRecord {
    /// Create the rule with 1-based position `index`.
    pub fn new(index: usize, description: impl Into<String>) -> Self {
        Self {
            id: format!("rule_{}", index),
            description: description.into(),
        }
    }
}
