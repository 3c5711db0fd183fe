//! Rendering module for the JSON output documents.

mod json;
mod result;

pub use json::{collection_to_json, to_json, to_json_documents, Collection, JsonFormat};
pub use result::ExtractionStats;
