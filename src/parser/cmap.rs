//! ToUnicode CMap parsing.
//!
//! Builds code-to-text tables from the `bfchar` and `bfrange` blocks of
//! decompressed CMap streams. Tables are kept in discovery order and are not
//! scoped to a font: any table may answer any code.

use std::collections::HashMap;

const BFCHAR_BEGIN: &str = "beginbfchar";
const BFCHAR_END: &str = "endbfchar";
const BFRANGE_BEGIN: &str = "beginbfrange";
const BFRANGE_END: &str = "endbfrange";

/// Largest `bfrange` span expanded; wider ranges are treated as malformed.
const MAX_RANGE_SPAN: u32 = 0xFFFF;

/// Mapping from character code to decoded text (possibly multi-character).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingTable {
    entries: HashMap<u32, String>,
}

impl EncodingTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `code` to `text`. Empty text is never stored.
    pub fn insert(&mut self, code: u32, text: String) {
        if !text.is_empty() {
            self.entries.insert(code, text);
        }
    }

    /// Look up a code.
    pub fn get(&self, code: u32) -> Option<&str> {
        self.entries.get(&code).map(String::as_str)
    }

    /// Number of mapped codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no code is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered list of encoding tables with first-match lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingTables {
    tables: Vec<EncodingTable>,
}

impl EncodingTables {
    /// Create an empty table list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table; it is consulted after every table already present.
    pub fn push(&mut self, table: EncodingTable) {
        self.tables.push(table);
    }

    /// Resolve a code against the tables in discovery order.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.tables.iter().find_map(|table| table.get(code))
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether there are no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total entries across all tables.
    pub fn entry_count(&self) -> usize {
        self.tables.iter().map(EncodingTable::len).sum()
    }

    /// Iterate tables in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &EncodingTable> {
        self.tables.iter()
    }
}

impl FromIterator<EncodingTable> for EncodingTables {
    fn from_iter<I: IntoIterator<Item = EncodingTable>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}

/// A parsed CMap stream.
#[derive(Debug, Clone, Default)]
pub struct ParsedCmap {
    /// The mappings that parsed
    pub table: EncodingTable,
    /// Lines inside a bf block that were skipped as malformed
    pub malformed_lines: usize,
}

/// Whether a decompressed stream defines character-to-text mappings.
pub fn is_cmap_stream(data: &[u8]) -> bool {
    contains(data, BFCHAR_BEGIN.as_bytes()) || contains(data, BFRANGE_BEGIN.as_bytes())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Outside,
    Char,
    Range,
}

/// Parse the `bfchar`/`bfrange` lines of a CMap stream.
///
/// Lines outside those blocks (codespace ranges, PostScript boilerplate) are
/// ignored. Malformed lines inside a block are skipped one by one.
pub fn parse_cmap(data: &[u8]) -> ParsedCmap {
    let text: String = data.iter().map(|&b| b as char).collect();
    let mut parsed = ParsedCmap::default();
    let mut block = Block::Outside;

    for line in text.split(|c: char| c == '\n' || c == '\r') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.contains(BFCHAR_END) || line.contains(BFRANGE_END) {
            block = Block::Outside;
            continue;
        }
        if line.contains(BFCHAR_BEGIN) {
            block = Block::Char;
            continue;
        }
        if line.contains(BFRANGE_BEGIN) {
            block = Block::Range;
            continue;
        }

        let ok = match block {
            Block::Outside => continue,
            Block::Char => parse_bfchar_line(line, &mut parsed.table),
            Block::Range => parse_bfrange_line(line, &mut parsed.table),
        };
        if !ok {
            log::debug!("Skipping malformed CMap line: {:?}", line);
            parsed.malformed_lines += 1;
        }
    }

    parsed
}

/// Build the ordered table list from every CMap stream in `streams`.
pub fn build_tables<'a, I>(streams: I) -> (EncodingTables, usize)
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut tables = EncodingTables::new();
    let mut malformed = 0;
    for data in streams {
        if !is_cmap_stream(data) {
            continue;
        }
        let parsed = parse_cmap(data);
        malformed += parsed.malformed_lines;
        tables.push(parsed.table);
    }
    (tables, malformed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Hex(&'a str),
    Open,
    Close,
}

/// Split a line into `<hex>` strings and array brackets; `None` on anything else.
fn tokenize(line: &str) -> Option<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('<') {
            let end = after.find('>')?;
            tokens.push(Token::Hex(&after[..end]));
            rest = &after[end + 1..];
        } else if let Some(after) = rest.strip_prefix('[') {
            tokens.push(Token::Open);
            rest = after;
        } else if let Some(after) = rest.strip_prefix(']') {
            tokens.push(Token::Close);
            rest = after;
        } else {
            return None;
        }
        rest = rest.trim_start();
    }
    Some(tokens)
}

fn parse_bfchar_line(line: &str, table: &mut EncodingTable) -> bool {
    let Some(tokens) = tokenize(line) else {
        return false;
    };
    let [Token::Hex(src), Token::Hex(dst)] = tokens.as_slice() else {
        return false;
    };
    let Some(code) = parse_code(src) else {
        return false;
    };
    table.insert(code, decode_destination(dst));
    true
}

fn parse_bfrange_line(line: &str, table: &mut EncodingTable) -> bool {
    let Some(tokens) = tokenize(line) else {
        return false;
    };
    let (lo, hi, rest) = match tokens.as_slice() {
        [Token::Hex(lo), Token::Hex(hi), rest @ ..] => (*lo, *hi, rest),
        _ => return false,
    };
    let (Some(lo), Some(hi)) = (parse_code(lo), parse_code(hi)) else {
        return false;
    };
    if hi < lo || hi - lo > MAX_RANGE_SPAN {
        return false;
    }

    match rest {
        [Token::Hex(dst)] => {
            let units = hex_units(dst);
            let Some((&last, prefix)) = units.split_last() else {
                return false;
            };
            for (i, code) in (lo..=hi).enumerate() {
                let Some(unit) = u16::try_from(u32::from(last) + i as u32).ok() else {
                    break;
                };
                let mut seq = prefix.to_vec();
                seq.push(unit);
                table.insert(code, decode_units(&seq));
            }
            true
        }
        [Token::Open, items @ .., Token::Close] => {
            if items.iter().any(|item| !matches!(item, Token::Hex(_))) {
                return false;
            }
            for (code, item) in (lo..=hi).zip(items) {
                if let Token::Hex(dst) = item {
                    table.insert(code, decode_destination(dst));
                }
            }
            true
        }
        _ => false,
    }
}

/// Parse a source code; whitespace inside the brackets is ignored.
fn parse_code(hex: &str) -> Option<u32> {
    let clean: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if clean.is_empty() {
        return None;
    }
    u32::from_str_radix(&clean, 16).ok()
}

/// Decode a destination string.
///
/// Multiples of four hex digits are UTF-16 code units. Any other length
/// leaves an odd byte count, so it is read as UTF-8, else empty.
pub fn decode_destination(hex: &str) -> String {
    let clean: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if clean.is_empty() {
        return String::new();
    }

    if clean.len() % 4 == 0 {
        return decode_units(&hex_units(&clean));
    }

    hex_bytes(&clean)
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_default()
}

/// Four-digit UTF-16 units; chunks that are not hex are dropped.
fn hex_units(hex: &str) -> Vec<u16> {
    hex.as_bytes()
        .chunks(4)
        .filter(|c| c.len() == 4)
        .filter_map(|c| std::str::from_utf8(c).ok())
        .filter_map(|c| u16::from_str_radix(c, 16).ok())
        .collect()
}

/// Decode UTF-16 units, pairing surrogates and dropping unpaired ones.
fn decode_units(units: &[u16]) -> String {
    char::decode_utf16(units.iter().copied())
        .filter_map(|r| r.ok())
        .collect()
}

fn hex_bytes(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(pair, 16).ok()
        })
        .collect()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
