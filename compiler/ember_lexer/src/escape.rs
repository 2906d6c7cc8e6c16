//! String escapes: validation during lexing, decoding for the parser.

use ember_diagnostic::{Code, Issues};
use ember_ir::{ChunkId, Span};

/// Decoded character for the byte after a backslash.
#[inline]
fn decode(byte: u8) -> Option<char> {
    match byte {
        b'n' => Some('\n'),
        b't' => Some('\t'),
        b'r' => Some('\r'),
        b'\\' => Some('\\'),
        b'"' => Some('"'),
        b'0' => Some('\0'),
        b'$' => Some('$'),
        _ => None,
    }
}

/// Raise `InvalidEscape` for every unknown escape in a string body.
///
/// `base` is the byte offset of `body` in the chunk.
pub(crate) fn check_escapes(body: &str, base: u32, chunk: ChunkId, issues: &mut Issues) {
    let bytes = body.as_bytes();
    let mut i = 0;
    while let Some(found) = memchr::memchr(b'\\', &bytes[i..]) {
        let at = i + found;
        let Some(&next) = bytes.get(at + 1) else {
            break;
        };
        if decode(next).is_none() {
            let len = body[at + 1..].chars().next().map_or(1, char::len_utf8);
            let start = base + u32::try_from(at).unwrap_or(0);
            let end = start + 1 + u32::try_from(len).unwrap_or(1);
            issues.raise(Code::InvalidEscape, Span::new(chunk, start, end));
        }
        i = at + 2;
    }
}

/// Decode a string body (without quotes). Unknown escapes keep the escaped
/// character; they were already reported by the lexer.
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped) => {
                let decoded = u8::try_from(escaped).ok().and_then(decode);
                out.push(decoded.unwrap_or(escaped));
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Body of a string token's text: quotes stripped, tolerant of a missing
/// closing quote.
pub fn string_body(text: &str) -> &str {
    let inner = text.strip_prefix('"').unwrap_or(text);
    inner.strip_suffix('"').unwrap_or(inner)
}
