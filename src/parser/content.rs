//! Text-showing operators in content streams.
//!
//! Only `TJ` (array form) and `Tj` (single form) are recognized. Positioning,
//! fonts and graphics state are ignored; kerning numbers inside `TJ` arrays
//! are dropped.

use regex::bytes::Regex;

use super::cmap::EncodingTables;

/// `[ ... ] TJ` where the array holds strings, numbers and whitespace only.
const ARRAY_SHOW_PATTERN: &str =
    r"(?s-u)\[((?:<[0-9A-Fa-f\s]*>|\((?:\\.|[^()\\])*\)|[^\[\]()<>])*)\]\s*TJ";

/// A hex or literal string inside a `TJ` array.
const ARRAY_TOKEN_PATTERN: &str = r"(?s-u)<([0-9A-Fa-f\s]+)>|\(((?:\\.|[^()\\])*)\)";

/// `<hex> Tj` or `(literal) Tj`.
const SINGLE_SHOW_PATTERN: &str = r"(?s-u)(<[0-9A-Fa-f\s]+>|\((?:\\.|[^()\\])*\))\s*Tj";

/// One string operand, without its delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringToken<'a> {
    /// Contents of `<...>`
    Hex(&'a [u8]),
    /// Contents of `(...)`, escapes still in place
    Literal(&'a [u8]),
}

impl StringToken<'_> {
    /// Decode the token to text.
    pub fn decode(&self, tables: &EncodingTables) -> String {
        match self {
            StringToken::Hex(hex) => decode_hex(hex, tables),
            StringToken::Literal(bytes) => decode_literal(bytes),
        }
    }
}

/// Which text-showing operator produced a [`TextShow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOperator {
    /// `TJ`
    Array,
    /// `Tj`
    Single,
}

/// One occurrence of a text-showing operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextShow<'a> {
    /// Operator form
    pub operator: ShowOperator,
    /// Byte offset of the operand within the content stream
    pub offset: usize,
    /// String operands in order
    pub tokens: Vec<StringToken<'a>>,
}

impl TextShow<'_> {
    /// Decode every operand, concatenate and trim.
    pub fn decode(&self, tables: &EncodingTables) -> String {
        let text: String = self.tokens.iter().map(|t| t.decode(tables)).collect();
        text.trim().to_string()
    }
}

/// Scanner for text-showing operators.
#[derive(Debug, Clone)]
pub struct ContentTokenizer {
    array_show: Regex,
    array_token: Regex,
    single_show: Regex,
}

impl ContentTokenizer {
    /// Create a new tokenizer.
    pub fn new() -> Self {
        Self {
            array_show: Regex::new(ARRAY_SHOW_PATTERN).expect("TJ pattern is valid"),
            array_token: Regex::new(ARRAY_TOKEN_PATTERN).expect("TJ token pattern is valid"),
            single_show: Regex::new(SINGLE_SHOW_PATTERN).expect("Tj pattern is valid"),
        }
    }

    /// Find every text-showing operator in `content`, ordered by offset.
    ///
    /// A `Tj` that sits inside a matched `TJ` array is not reported twice.
    pub fn scan<'a>(&self, content: &'a [u8]) -> Vec<TextShow<'a>> {
        let mut shows = Vec::new();
        let mut array_spans = Vec::new();

        for caps in self.array_show.captures_iter(content) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            array_spans.push(whole.range());

            let tokens = self
                .array_token
                .captures_iter(inner.as_bytes())
                .filter_map(|t| match (t.get(1), t.get(2)) {
                    (Some(hex), _) => Some(StringToken::Hex(hex.as_bytes())),
                    (None, Some(lit)) => Some(StringToken::Literal(lit.as_bytes())),
                    (None, None) => None,
                })
                .collect();

            shows.push(TextShow {
                operator: ShowOperator::Array,
                offset: whole.start(),
                tokens,
            });
        }

        for caps in self.single_show.captures_iter(content) {
            let Some(operand) = caps.get(1) else {
                continue;
            };
            if array_spans.iter().any(|span| span.contains(&operand.start())) {
                continue;
            }

            let raw = operand.as_bytes();
            let inner = &raw[1..raw.len() - 1];
            let token = if raw[0] == b'<' {
                StringToken::Hex(inner)
            } else {
                StringToken::Literal(inner)
            };

            shows.push(TextShow {
                operator: ShowOperator::Single,
                offset: operand.start(),
                tokens: vec![token],
            });
        }

        shows.sort_by_key(|show| show.offset);
        shows
    }

    /// Decoded, trimmed, non-empty text of every operator in `content`.
    pub fn fragments(&self, content: &[u8], tables: &EncodingTables) -> Vec<String> {
        self.scan(content)
            .iter()
            .map(|show| show.decode(tables))
            .filter(|text| !text.is_empty())
            .collect()
    }
}

impl Default for ContentTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `content` mentions a text-showing operator at all.
pub fn has_text_operators(content: &[u8]) -> bool {
    content
        .windows(2)
        .any(|w| w == b"TJ" || w == b"Tj")
}

/// Decode a hex string as a run of 4-digit codes.
///
/// Each code is resolved through `tables`; unmapped codes are taken as
/// Unicode scalar values directly.
pub fn decode_hex(hex: &[u8], tables: &EncodingTables) -> String {
    let clean: Vec<u8> = hex
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    let mut out = String::new();
    for chunk in clean.chunks(4) {
        let Some(code) = std::str::from_utf8(chunk)
            .ok()
            .and_then(|s| u32::from_str_radix(s, 16).ok())
        else {
            continue;
        };
        match tables.lookup(code) {
            Some(text) => out.push_str(text),
            None => out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)),
        }
    }
    out
}

/// Decode the contents of a literal string.
///
/// A backslash takes the next byte verbatim (`\n` yields `n`). The result is
/// read as UTF-8, falling back to Latin-1.
pub fn decode_literal(content: &[u8]) -> String {
    let mut bytes = Vec::with_capacity(content.len());
    let mut escape = false;
    for &b in content {
        if escape {
            bytes.push(b);
            escape = false;
        } else if b == b'\\' {
            escape = true;
        } else {
            bytes.push(b);
        }
    }

    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}
