//! Text extraction: streams in, newline-joined fragments out.

use std::io::Read;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::detect::detect_format_from_bytes;
use crate::error::Result;
use crate::render::ExtractionStats;

use super::backend::{ScanBackend, StreamSource};
use super::cmap::build_tables;
use super::content::{has_text_operators, ContentTokenizer};
use super::options::{ErrorMode, ParseOptions};

/// One piece of rendered text and the stream it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    /// Object number of the content stream
    pub object_id: u64,
    /// Byte offset of the operator within the decompressed stream
    pub offset: usize,
    /// Decoded, trimmed text; never empty
    pub text: String,
}

impl AsRef<str> for TextFragment {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Fragments recovered from a document, with counters.
#[derive(Debug, Clone, Default)]
pub struct ExtractedText {
    /// Fragments in stream order, then operator order
    pub fragments: Vec<TextFragment>,
    /// Stream and table counters
    pub stats: ExtractionStats,
}

impl ExtractedText {
    /// All fragments joined with `\n`.
    pub fn text(&self) -> String {
        assemble(&self.fragments)
    }

    /// Whether nothing was recovered.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Join fragments with a newline, preserving order.
pub fn assemble<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts text from raw PDF bytes without an object model.
pub struct TextExtractor {
    data: Vec<u8>,
    options: ParseOptions,
    source: Box<dyn StreamSource>,
}

impl TextExtractor {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_vec(data, options)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Load a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        Self::from_vec(data.to_vec(), options)
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Load a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_vec(data, options)
    }

    fn from_vec(data: Vec<u8>, options: ParseOptions) -> Result<Self> {
        if options.error_mode == ErrorMode::Strict {
            let format = detect_format_from_bytes(&data)?;
            log::debug!("Detected {}", format);
        }
        Ok(Self {
            data,
            options,
            source: Box::new(ScanBackend::new()),
        })
    }

    /// Replace the stream source.
    pub fn with_source(mut self, source: impl StreamSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// The raw document bytes.
    pub fn document(&self) -> &[u8] {
        &self.data
    }

    /// The options this extractor was built with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Run stream location, table building and tokenization.
    pub fn extract(&self) -> ExtractedText {
        let mut stats = ExtractionStats::new();

        let streams = self.source.decoded_streams(&self.data);
        stats.streams_found = streams.len();
        stats.streams_decoded = streams.iter().filter(|s| s.is_decoded()).count();
        stats.streams_skipped = stats.streams_found - stats.streams_decoded;
        log::debug!(
            "{} backend: {} streams, {} skipped",
            self.source.name(),
            stats.streams_found,
            stats.streams_skipped
        );

        let (tables, malformed) = build_tables(streams.iter().filter_map(|s| s.data()));
        stats.encoding_tables = tables.len();
        stats.encoding_entries = tables.entry_count();
        stats.malformed_entries = malformed;

        let tokenizer = ContentTokenizer::new();
        let mut fragments = Vec::new();
        for stream in &streams {
            let Some(data) = stream.data() else {
                continue;
            };
            if !has_text_operators(data) {
                continue;
            }
            for show in tokenizer.scan(data) {
                let text = show.decode(&tables);
                if text.is_empty() {
                    continue;
                }
                let text = if self.options.normalize_unicode {
                    text.nfc().collect()
                } else {
                    text
                };
                fragments.push(TextFragment {
                    object_id: stream.object_id(),
                    offset: show.offset,
                    text,
                });
            }
        }

        if fragments.is_empty() {
            log::warn!("No text fragments recovered from {} streams", stats.streams_found);
        }
        stats.fragments = fragments.len();
        for fragment in &fragments {
            stats.count_text(&fragment.text);
        }

        ExtractedText { fragments, stats }
    }
}

impl std::fmt::Debug for TextExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextExtractor")
            .field("len", &self.data.len())
            .field("options", &self.options)
            .field("source", &self.source.name())
            .finish()
    }
}
