//! Spellcheck support.
//!
//! The engine's spellchecker only sees the unquoted words of a phrase and answers with a
//! flat, space-separated correction. [`merge_spellcheck`] puts those corrected words back
//! into the original phrase, leaving quoted phrases exactly as the user typed them.

use crate::tokenize::{Segment, tokenize_phrase};

/// Returns the text to hand to the spellchecker: the unquoted words of `phrase`, joined
/// by single spaces.
///
/// Returns `None` when the phrase has no unquoted words.
pub fn spellcheck_query(phrase: &str) -> Option<String> {
    let words: Vec<&str> = tokenize_phrase(phrase)
        .iter()
        .filter(|segment| !segment.quoted)
        .flat_map(|segment| segment.split_words())
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

/// Merges a spellchecker correction into the original phrase.
///
/// Each unquoted word of the original consumes the next corrected word; quoted segments
/// pass through unchanged. Segments are rejoined with single spaces while the spacing
/// inside an unquoted run is preserved. When the correction has fewer words than the
/// original, the remaining words are kept as typed; surplus corrected words are dropped.
///
/// An empty original or an empty correction returns the original unchanged.
pub fn merge_spellcheck(original: &str, corrected: &str) -> String {
    if original.trim().is_empty() || corrected.trim().is_empty() {
        return original.to_string();
    }

    let mut corrections = corrected.split_whitespace();
    let merged = tokenize_phrase(original)
        .iter()
        .map(|segment| {
            if segment.quoted {
                segment.text.to_string()
            } else {
                replace_words(segment, &mut corrections)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    let surplus = corrections.count();
    if surplus > 0 {
        log::debug!("dropping {surplus} surplus spellcheck words for {original:?}");
    }
    merged
}

/// Rebuilds an unquoted segment with its words replaced from `corrections`.
fn replace_words<'a>(
    segment: &Segment<'_>,
    corrections: &mut impl Iterator<Item = &'a str>,
) -> String {
    let text = segment.text;
    let mut out = String::with_capacity(text.len());
    let mut word_start = None;

    for (idx, ch) in text.char_indices() {
        match (ch.is_whitespace(), word_start) {
            (true, Some(start)) => {
                push_word(&mut out, corrections.next(), &text[start..idx]);
                out.push(ch);
                word_start = None;
            }
            (true, None) => out.push(ch),
            (false, None) => word_start = Some(idx),
            (false, Some(_)) => {}
        }
    }
    if let Some(start) = word_start {
        push_word(&mut out, corrections.next(), &text[start..]);
    }

    out
}

/// Appends the correction, or the original word when corrections ran out.
fn push_word(out: &mut String, correction: Option<&str>, original: &str) {
    out.push_str(correction.unwrap_or(original));
}
