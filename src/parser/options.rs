//! Parsing options and configuration.

use crate::records::{SectionMarkers, DEFAULT_CITIES};

/// Options for extracting records from a document.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Input validation mode
    pub error_mode: ErrorMode,

    /// Apply Unicode NFC normalization to every text fragment
    pub normalize_unicode: bool,

    /// Section headings that split the extracted text
    pub markers: SectionMarkers,

    /// Closed set of city names recognized in the facilities section
    pub cities: Vec<String>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Require a `%PDF-` header before scanning.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Scan any input bytes (default).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable NFC normalization of fragments.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Set the section headings.
    pub fn with_markers(mut self, markers: SectionMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// Replace the recognized city names.
    pub fn with_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cities = cities.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            normalize_unicode: false,
            markers: SectionMarkers::default(),
            cities: DEFAULT_CITIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// How strictly the input is validated before scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Reject input without a valid PDF header
    Strict,
    /// Scan whatever bytes are given
    #[default]
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .strict()
            .with_unicode_normalization(true)
            .with_cities(["Multan", "Sukkur"]);

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.normalize_unicode);
        assert_eq!(options.cities, vec!["Multan", "Sukkur"]);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.normalize_unicode);
        assert_eq!(options.cities.len(), 5);
        assert!(options.cities.iter().any(|c| c == "Karachi"));
        assert_eq!(options.markers, SectionMarkers::default());
    }
}
