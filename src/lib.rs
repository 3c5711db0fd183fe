//! # sehatpdf
//!
//! Recovers text from a Sehat Card information PDF and turns it into
//! structured records.
//!
//! Text is extracted without a PDF object model: stream objects are located
//! by pattern, inflated, and their text-showing operators decoded through any
//! embedded ToUnicode tables. The resulting text is split into sections and
//! parsed into facilities, citizen profiles and rule sentences.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sehatpdf::{parse_file, render, JsonFormat};
//!
//! fn main() -> sehatpdf::Result<()> {
//!     let doc = parse_file("Mock Data for Sehat Card Agent.pdf")?;
//!
//!     let json = render::to_json(&doc, JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Stream recovery**: zlib/deflate content streams, corrupt ones skipped
//! - **ToUnicode tables**: `bfchar` and `bfrange` mappings
//! - **Record parsing**: facilities by city, citizen profiles, rule sentences
//! - **JSON output**: three single-key documents in a fixed order

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod records;
pub mod render;

pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use model::{CitizenRecord, FacilityRecord, FacilityType, RuleRecord, SehatDocument};
pub use parser::{ErrorMode, ExtractedText, ParseOptions, TextExtractor};
pub use records::{RecordParser, SectionMarkers};
pub use render::{Collection, ExtractionStats, JsonFormat};

use std::io::Read;
use std::path::Path;

/// Extract the assembled text of a PDF file.
///
/// # Example
///
/// ```no_run
/// use sehatpdf::extract_text;
///
/// let text = extract_text("document.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(TextExtractor::open(path)?.extract().text())
}

/// Extract the assembled text of a PDF held in memory.
pub fn extract_text_from_bytes(data: &[u8]) -> Result<String> {
    Ok(TextExtractor::from_bytes(data)?.extract().text())
}

/// Parse a PDF file into the three record collections.
///
/// # Arguments
///
/// * `path` - Path to the PDF file
///
/// # Errors
///
/// Fails if the file cannot be read or a required section heading is not
/// present in the extracted text.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SehatDocument> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Parse a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use sehatpdf::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new()
///     .strict()
///     .with_cities(["Karachi", "Multan"]);
/// let doc = parse_file_with_options("document.pdf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<SehatDocument> {
    SehatPdf::with_options(options).parse(path).map(|r| r.document)
}

/// Parse a PDF from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<SehatDocument> {
    parse_bytes_with_options(data, ParseOptions::default())
}

/// Parse a PDF from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<SehatDocument> {
    SehatPdf::with_options(options)
        .parse_bytes(data)
        .map(|r| r.document)
}

/// Parse a PDF from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<SehatDocument> {
    SehatPdf::new().parse_reader(reader).map(|r| r.document)
}

/// Convert a PDF file to the three JSON documents.
///
/// # Example
///
/// ```no_run
/// use sehatpdf::{to_json, JsonFormat};
///
/// let json = to_json("document.pdf", JsonFormat::Pretty).unwrap();
/// println!("{}", json);
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for running the pipeline with custom options.
///
/// # Example
///
/// ```no_run
/// use sehatpdf::{SehatPdf, JsonFormat};
///
/// let result = SehatPdf::new()
///     .strict()
///     .normalize_unicode()
///     .parse("document.pdf")?;
/// println!("{} facilities", result.stats().facility_count);
/// println!("{}", result.to_json(JsonFormat::Compact)?);
/// # Ok::<(), sehatpdf::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SehatPdf {
    parse_options: ParseOptions,
}

impl SehatPdf {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from existing options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            parse_options: options,
        }
    }

    /// Require a PDF header.
    pub fn strict(mut self) -> Self {
        self.parse_options = self.parse_options.strict();
        self
    }

    /// Scan any bytes (default).
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Apply NFC normalization to extracted fragments.
    pub fn normalize_unicode(mut self) -> Self {
        self.parse_options = self.parse_options.with_unicode_normalization(true);
        self
    }

    /// Override the section headings.
    pub fn with_markers(mut self, markers: SectionMarkers) -> Self {
        self.parse_options = self.parse_options.with_markers(markers);
        self
    }

    /// Override the recognized city names.
    pub fn with_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parse_options = self.parse_options.with_cities(cities);
        self
    }

    /// The options the pipeline will run with.
    pub fn options(&self) -> &ParseOptions {
        &self.parse_options
    }

    /// Parse a PDF file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<SehatPdfResult> {
        let extractor = TextExtractor::open_with_options(path, self.parse_options.clone())?;
        self.run(&extractor)
    }

    /// Parse a PDF from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<SehatPdfResult> {
        let extractor = TextExtractor::from_bytes_with_options(data, self.parse_options.clone())?;
        self.run(&extractor)
    }

    /// Parse a PDF from a reader.
    pub fn parse_reader<R: Read>(self, reader: R) -> Result<SehatPdfResult> {
        let extractor = TextExtractor::from_reader_with_options(reader, self.parse_options.clone())?;
        self.run(&extractor)
    }

    fn run(&self, extractor: &TextExtractor) -> Result<SehatPdfResult> {
        let records = RecordParser::new(&self.parse_options)?;
        let extracted = extractor.extract();
        let text = extracted.text();

        let mut stats = extracted.stats;
        let document = records.parse(&text, &mut stats)?;

        Ok(SehatPdfResult {
            document,
            text,
            stats,
        })
    }
}

/// Result of running the pipeline on one document.
#[derive(Debug, Clone)]
pub struct SehatPdfResult {
    /// The parsed records
    pub document: SehatDocument,
    /// The assembled text the records were parsed from
    pub text: String,
    /// Extraction and parsing counters
    pub stats: ExtractionStats,
}

impl SehatPdfResult {
    /// Render the three JSON documents.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Render a single collection.
    pub fn collection_json(&self, collection: Collection, format: JsonFormat) -> Result<String> {
        render::collection_to_json(&self.document, collection, format)
    }

    /// The assembled text.
    pub fn plain_text(&self) -> &str {
        &self.text
    }

    /// Extraction statistics.
    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    /// Get the document.
    pub fn document(&self) -> &SehatDocument {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = SehatPdf::new();
        assert_eq!(builder.options().error_mode, ErrorMode::Lenient);
        assert!(!builder.options().normalize_unicode);
    }

    #[test]
    fn test_builder_chained() {
        let builder = SehatPdf::new()
            .strict()
            .normalize_unicode()
            .with_cities(["Multan"])
            .with_markers(SectionMarkers::new("A", "B", "C"));

        assert_eq!(builder.options().error_mode, ErrorMode::Strict);
        assert!(builder.options().normalize_unicode);
        assert_eq!(builder.options().cities, vec!["Multan"]);
        assert_eq!(builder.options().markers.citizens, "B");
    }

    #[test]
    fn test_builder_lenient_after_strict() {
        let builder = SehatPdf::new().strict().lenient();
        assert_eq!(builder.options().error_mode, ErrorMode::Lenient);
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_parse_bytes_empty_data() {
        // No text means no headings
        let result = parse_bytes(&[]);
        assert!(matches!(result, Err(Error::MissingSectionMarker { .. })));
    }

    #[test]
    fn test_parse_bytes_strict_rejects_non_pdf() {
        let result = SehatPdf::new().strict().parse_bytes(b"not a pdf");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_extract_text_from_bytes_without_streams() {
        let text = extract_text_from_bytes(b"%PDF-1.4\n%%EOF").unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_empty_marker_is_config_error() {
        let result = SehatPdf::new()
            .with_markers(SectionMarkers::new("", "B", "C"))
            .parse_bytes(b"");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file("/nonexistent/sehat.pdf");
        assert!(matches!(result, Err(ref e) if e.is_input_error()));
    }

    #[test]
    fn test_detect_valid_pdf_17() {
        let format = detect_format_from_bytes(b"%PDF-1.7\n%test").unwrap();
        assert_eq!(format.version, "1.7");
    }
}
