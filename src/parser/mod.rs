//! PDF text extraction module.

mod backend;
pub mod cmap;
pub mod content;
mod extractor;
mod options;
pub mod stream;

pub use backend::{ScanBackend, StreamSource};
pub use cmap::{EncodingTable, EncodingTables};
pub use content::ContentTokenizer;
pub use extractor::{assemble, ExtractedText, TextExtractor, TextFragment};
pub use options::{ErrorMode, ParseOptions};
pub use stream::{DecodedStream, StreamLocator, StreamObject};
