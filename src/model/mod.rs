//! Record types produced by the pipeline.
//!
//! Field names and order match the JSON output: each collection serializes
//! exactly as it is printed.

mod document;
mod record;

pub use document::SehatDocument;
pub use record::{CitizenRecord, FacilityRecord, FacilityType, RuleRecord};
