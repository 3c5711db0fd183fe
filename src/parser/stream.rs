//! Stream object location and decompression.
//!
//! Streams are found by pattern over the raw document bytes rather than by
//! walking the cross-reference table, so documents with broken or missing
//! xref sections still yield their content.

use std::io;

use flate2::{Decompress, FlushDecompress, Status};
use regex::bytes::Regex;

/// `N 0 obj`, an optional dictionary, then a body between `stream` and `endstream`.
const STREAM_PATTERN: &str =
    r"(?s-u)(\d+) 0 obj\s*(<<.*?>>)?\s*stream\r?\n(.*?)\r?\nendstream\s*endobj";

const OBJECT_HEADER_PATTERN: &str = r"(?-u)(\d+) 0 obj";

/// A stream object as it appears in the document, still compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamObject<'a> {
    /// Object number from the `N 0 obj` header
    pub object_id: u64,
    /// Byte offset of the object header within the document
    pub offset: usize,
    /// Raw stream dictionary (`<< ... >>`), if present
    pub dictionary: Option<&'a [u8]>,
    /// Raw stream body
    pub data: &'a [u8],
}

/// Result of decompressing one [`StreamObject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedStream {
    /// The body inflated cleanly.
    Decoded {
        /// Object number of the source stream
        object_id: u64,
        /// Decompressed bytes
        data: Vec<u8>,
    },
    /// The body was not deflate data or was corrupt; it contributes nothing.
    Skipped {
        /// Object number of the source stream
        object_id: u64,
        /// Why decompression failed
        reason: String,
    },
}

impl DecodedStream {
    /// Object number of the source stream.
    pub fn object_id(&self) -> u64 {
        match self {
            DecodedStream::Decoded { object_id, .. } | DecodedStream::Skipped { object_id, .. } => {
                *object_id
            }
        }
    }

    /// Decompressed bytes, or `None` for a skipped stream.
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            DecodedStream::Decoded { data, .. } => Some(data),
            DecodedStream::Skipped { .. } => None,
        }
    }

    /// Whether decompression succeeded.
    pub fn is_decoded(&self) -> bool {
        matches!(self, DecodedStream::Decoded { .. })
    }
}

/// Finds stream objects in raw document bytes.
#[derive(Debug, Clone)]
pub struct StreamLocator {
    pattern: Regex,
    header: Regex,
}

impl StreamLocator {
    /// Create a new locator.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(STREAM_PATTERN).expect("stream pattern is valid"),
            header: Regex::new(OBJECT_HEADER_PATTERN).expect("object header pattern is valid"),
        }
    }

    /// Locate every stream object, in document order.
    pub fn locate<'a>(&self, document: &'a [u8]) -> Vec<StreamObject<'a>> {
        self.pattern
            .captures_iter(document)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let body = caps.get(3)?;

                // A lazy dictionary can run on from a stream-less object into
                // the next one; the body belongs to the last header before it.
                let prefix = &document[whole.start()..body.start()];
                let last = self.header.captures_iter(prefix).last()?;
                let header = last.get(0)?;
                let dictionary = if header.start() == 0 {
                    caps.get(2).map(|m| m.as_bytes())
                } else {
                    find_dictionary(&prefix[header.end()..])
                };

                Some(StreamObject {
                    object_id: parse_object_id(last.get(1)?.as_bytes()),
                    offset: whole.start() + header.start(),
                    dictionary,
                    data: body.as_bytes(),
                })
            })
            .collect()
    }

    /// Locate and decompress every stream object, in document order.
    pub fn decode_all(&self, document: &[u8]) -> Vec<DecodedStream> {
        self.locate(document).iter().map(decode_stream).collect()
    }
}

impl Default for StreamLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Decompress one stream object.
pub fn decode_stream(stream: &StreamObject<'_>) -> DecodedStream {
    match inflate(stream.data) {
        Ok(data) => DecodedStream::Decoded {
            object_id: stream.object_id,
            data,
        },
        Err(e) => {
            log::debug!("Skipping stream object {}: {}", stream.object_id, e);
            DecodedStream::Skipped {
                object_id: stream.object_id,
                reason: e.to_string(),
            }
        }
    }
}

/// Inflate zlib-wrapped deflate data.
///
/// Fails unless the deflate stream reaches its final block, so truncated
/// input never yields partial output.
pub fn inflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len().saturating_mul(4).max(64));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity().max(64));
        }

        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();
        let status = inflater
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::Finish)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if matches!(status, Status::StreamEnd) {
            return Ok(out);
        }

        // No progress with spare output capacity: input is exhausted.
        if inflater.total_in() as usize == consumed && inflater.total_out() == produced {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "deflate stream ended before its final block",
            ));
        }
    }
}

/// The outermost `<< ... >>` in the bytes between an object header and `stream`.
fn find_dictionary(region: &[u8]) -> Option<&[u8]> {
    let start = region.windows(2).position(|w| w == b"<<")?;
    let end = region.windows(2).rposition(|w| w == b">>")?;
    (end > start).then(|| &region[start..end + 2])
}

fn parse_object_id(digits: &[u8]) -> u64 {
    digits.iter().fold(0u64, |acc, &d| {
        acc.saturating_mul(10).saturating_add(u64::from(d - b'0'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn compress(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn stream_object(id: u32, dict: &str, body: &[u8]) -> Vec<u8> {
        let mut out = format!("{} 0 obj\n{}\nstream\n", id, dict).into_bytes();
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendstream\nendobj\n");
        out
    }

    #[test]
    fn test_inflate_roundtrip() {
        let data = b"BT (Hello) Tj ET".repeat(50);
        assert_eq!(inflate(&compress(&data)).unwrap(), data);
    }

    #[test]
    fn test_inflate_rejects_plain_text() {
        assert!(inflate(b"BT (Hello) Tj ET").is_err());
    }

    #[test]
    fn test_inflate_rejects_truncated() {
        let compressed = compress(&b"some stream content ".repeat(40));
        let truncated = &compressed[..compressed.len() / 2];
        assert!(inflate(truncated).is_err());
    }

    #[test]
    fn test_inflate_rejects_empty() {
        assert!(inflate(b"").is_err());
    }

    #[test]
    fn test_locate_preserves_document_order() {
        let mut doc = b"%PDF-1.4\n".to_vec();
        doc.extend(stream_object(7, "<< /Length 3 >>", b"abc"));
        doc.extend(b"3 0 obj\n<< /Type /Catalog >>\nendobj\n");
        doc.extend(stream_object(2, "", b"line1\nline2"));

        let locator = StreamLocator::new();
        let streams = locator.locate(&doc);
        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].object_id, 7);
        assert_eq!(streams[0].dictionary, Some(&b"<< /Length 3 >>"[..]));
        assert_eq!(streams[0].data, b"abc");
        assert_eq!(streams[1].object_id, 2);
        assert_eq!(streams[1].dictionary, None);
        assert_eq!(streams[1].data, b"line1\nline2");
        assert!(streams[0].offset < streams[1].offset);
    }

    #[test]
    fn test_stream_after_dictionary_only_object() {
        let mut doc = b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_vec();
        doc.extend(stream_object(5, "<< /Length 4 >>", b"body"));

        let streams = StreamLocator::new().locate(&doc);
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].object_id, 5);
        assert_eq!(streams[0].dictionary, Some(&b"<< /Length 4 >>"[..]));
        assert_eq!(&doc[streams[0].offset..streams[0].offset + 7], b"5 0 obj");
        assert_eq!(streams[0].data, b"body");
    }

    #[test]
    fn test_body_may_contain_binary_bytes() {
        let body = compress(b"BT (x) Tj ET");
        let doc = stream_object(1, "<< /Filter /FlateDecode >>", &body);
        let streams = StreamLocator::new().locate(&doc);
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].data, body.as_slice());
    }

    #[test]
    fn test_decode_all_skips_corrupt_streams() {
        let mut doc = stream_object(1, "", b"not deflate");
        doc.extend(stream_object(2, "", &compress(b"payload")));

        let decoded = StreamLocator::new().decode_all(&doc);
        assert_eq!(decoded.len(), 2);
        assert!(!decoded[0].is_decoded());
        assert_eq!(decoded[0].object_id(), 1);
        assert_eq!(decoded[0].data(), None);
        assert_eq!(decoded[1].data(), Some(&b"payload"[..]));
    }

    #[test]
    fn test_crlf_stream_delimiters() {
        let body = compress(b"crlf");
        let mut doc = b"4 0 obj\r\n<< >>\r\nstream\r\n".to_vec();
        doc.extend_from_slice(&body);
        doc.extend_from_slice(b"\r\nendstream\r\nendobj");

        let decoded = StreamLocator::new().decode_all(&doc);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].data(), Some(&b"crlf"[..]));
    }

    #[test]
    fn test_parse_object_id_saturates() {
        assert_eq!(parse_object_id(b"42"), 42);
        assert_eq!(parse_object_id(b"99999999999999999999999"), u64::MAX);
    }
}
