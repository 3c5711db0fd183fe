//! Error types for sehatpdf library.

use std::io;
use thiserror::Error;

/// Result type alias for sehatpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can surface from the extraction pipeline.
///
/// Per-item problems (a stream that fails to inflate, a malformed CMap line,
/// an incomplete citizen block) are not errors: they are skipped where they
/// occur and counted in [`crate::render::ExtractionStats`].
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input does not carry a PDF header (strict mode only).
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header names a version that is not `d.d`.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// A required section heading was not found in the extracted text.
    #[error("Required section heading not found in the PDF text: {marker:?}")]
    MissingSectionMarker {
        /// The literal heading that could not be located.
        marker: String,
    },

    /// Error during JSON rendering.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Options that cannot drive the pipeline (e.g. an empty marker).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a missing-marker error for the given heading.
    pub fn missing_marker(marker: impl Into<String>) -> Self {
        Error::MissingSectionMarker {
            marker: marker.into(),
        }
    }

    /// Whether this error came from reading the input rather than from extraction.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}
