//! Stream source abstraction layer.
//!
//! Provides a trait-based interface for obtaining decompressed streams,
//! isolating the byte-pattern scanner from the CMap and content stages so a
//! full object-model parser could replace it without touching them.

use super::stream::{DecodedStream, StreamLocator};

/// Abstract interface for producing the decoded stream set of a document.
pub trait StreamSource {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Every stream object in `document`, decompressed, in document order.
    ///
    /// Streams that fail to decompress are reported as
    /// [`DecodedStream::Skipped`]; implementations never abort.
    fn decoded_streams(&self, document: &[u8]) -> Vec<DecodedStream>;
}

// ---------------------------------------------------------------------------
// ScanBackend — pattern scanner over raw bytes
// ---------------------------------------------------------------------------

/// Concrete [`StreamSource`] that scans raw bytes for `obj ... stream` bodies.
#[derive(Debug, Clone, Default)]
pub struct ScanBackend {
    locator: StreamLocator,
}

impl ScanBackend {
    /// Create a new scanning backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreamSource for ScanBackend {
    fn name(&self) -> &str {
        "scan"
    }

    fn decoded_streams(&self, document: &[u8]) -> Vec<DecodedStream> {
        self.locator.decode_all(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    /// Source that hands back fixed streams, as a replacement backend would.
    struct FixedSource(Vec<DecodedStream>);

    impl StreamSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        fn decoded_streams(&self, _document: &[u8]) -> Vec<DecodedStream> {
            self.0.clone()
        }
    }

    #[test]
    fn test_scan_backend_decodes() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"payload").unwrap();
        let body = encoder.finish().unwrap();

        let mut doc = b"1 0 obj\n<< /Filter /FlateDecode >>\nstream\n".to_vec();
        doc.extend_from_slice(&body);
        doc.extend_from_slice(b"\nendstream\nendobj\n");

        let backend = ScanBackend::new();
        assert_eq!(backend.name(), "scan");
        let streams = backend.decoded_streams(&doc);
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].data(), Some(&b"payload"[..]));
    }

    #[test]
    fn test_trait_object_dispatch() {
        let source: Box<dyn StreamSource> = Box::new(FixedSource(vec![DecodedStream::Skipped {
            object_id: 9,
            reason: "test".to_string(),
        }]));
        let streams = source.decoded_streams(b"");
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].object_id(), 9);
    }
}
