//! Quote-aware phrase tokenizer.
//!
//! A phrase is scanned left to right. A `"` opens a quoted segment that runs to the next
//! unescaped `"` (or the end of the input when unterminated). Everything between quoted
//! segments forms one unquoted segment with its interior spacing kept verbatim.

use serde::Serialize;

/// A run of a tokenized phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    /// Slice of the original phrase. Quoted segments include their quote characters.
    pub text: &'a str,
    /// Whether the segment is a quoted phrase.
    pub quoted: bool,
}

impl<'a> Segment<'a> {
    /// Creates an unquoted segment.
    pub fn words(text: &'a str) -> Self {
        Self {
            text,
            quoted: false,
        }
    }

    /// Creates a quoted segment.
    pub fn phrase(text: &'a str) -> Self {
        Self { text, quoted: true }
    }

    /// Contents of a quoted segment without the surrounding quotes.
    ///
    /// Unquoted segments are returned unchanged.
    pub fn inner(&self) -> &'a str {
        if !self.quoted {
            return self.text;
        }
        let body = self.text.strip_prefix('"').unwrap_or(self.text);
        if is_terminated(body) {
            &body[..body.len() - 1]
        } else {
            body
        }
    }

    /// Whitespace-separated words of the segment.
    pub fn split_words(&self) -> impl Iterator<Item = &'a str> {
        self.inner().split_whitespace()
    }
}

/// Whether the body of a quoted segment (after the opening quote) ends in a closing quote.
fn is_terminated(body: &str) -> bool {
    let Some(rest) = body.strip_suffix('"') else {
        return false;
    };
    let escapes = rest.bytes().rev().take_while(|&b| b == b'\\').count();
    escapes % 2 == 0
}

/// Splits a phrase into quoted and unquoted segments.
///
/// Leading and trailing whitespace of unquoted runs is dropped, interior spacing is kept.
/// Quoted segments are returned verbatim, quotes included; `\"` inside a quoted segment
/// does not close it. Quoted segments with blank contents (`""`) carry nothing to search
/// for and are dropped.
pub fn tokenize_phrase(phrase: &str) -> Vec<Segment<'_>> {
    let bytes = phrase.as_bytes();
    let mut segments = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == b'"' {
            let end = quoted_end(bytes, pos);
            let segment = Segment::phrase(&phrase[pos..end]);
            if !segment.inner().trim().is_empty() {
                segments.push(segment);
            }
            pos = end;
        } else {
            let end = bytes[pos..]
                .iter()
                .position(|&b| b == b'"')
                .map_or(bytes.len(), |offset| pos + offset);
            let text = phrase[pos..end].trim();
            if !text.is_empty() {
                segments.push(Segment::words(text));
            }
            pos = end;
        }
    }

    segments
}

/// Byte offset just past the quoted segment opening at `start`.
fn quoted_end(bytes: &[u8], start: usize) -> usize {
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'"' => return pos + 1,
            _ => pos += 1,
        }
    }
    bytes.len()
}
