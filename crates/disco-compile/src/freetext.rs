//! Free-text values.
//!
//! An `==`/`!=` comparison whose value reads like a search phrase rather than a single
//! term is expanded into per-word clauses: quoted phrases go to the field's exact
//! variant, plain words to its stemmed variant.

use disco_config::{FieldDescriptor, FieldProvider};
use disco_text::tokenize_phrase;

/// Characters that make a value free text.
const FREE_TEXT_CHARS: &[char] = &[
    '"', '(', ')', '[', ']', '{', '}', '~', '^', '?', ':', '\\', '/', '+', '!',
];

/// Engine syntax characters escaped inside free-text words. `*` and `?` stay live.
const ESCAPED_CHARS: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', ':', '\\', '/',
];

/// Whether a comparison value should be treated as free text.
///
/// True for values containing whitespace, quotes or search-syntax characters, and for
/// wildcard values other than a lone `*`.
pub fn is_free_text(value: &str) -> bool {
    let value = value.trim();
    value
        .chars()
        .any(|ch| ch.is_whitespace() || FREE_TEXT_CHARS.contains(&ch))
        || (value.contains('*') && value != "*")
}

/// Escapes engine syntax in a single word, leaving wildcards intact.
pub fn escape_term(word: &str) -> String {
    let mut escaped = String::with_capacity(word.len());
    for ch in word.chars() {
        if ESCAPED_CHARS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Builds the free-text clause group for `value` on `field`.
///
/// Returns an empty string when the value holds nothing searchable.
pub fn build_free_text<P>(
    fields: &P,
    field: &FieldDescriptor,
    value: &str,
    negated: bool,
) -> String
where
    P: FieldProvider + ?Sized,
{
    let exact = fields
        .exact_variant(&field.name)
        .unwrap_or_else(|| field.name.clone());
    let stemmed = fields
        .stemmed_variant(&field.name)
        .unwrap_or_else(|| field.name.clone());

    let mut clauses = Vec::new();
    for segment in tokenize_phrase(value) {
        if segment.quoted {
            let phrase = segment.inner().trim();
            if !phrase.is_empty() {
                clauses.push(format!("{exact}:\"{}\"", close_escapes(phrase)));
            }
        } else {
            clauses.extend(
                segment
                    .split_words()
                    .map(escape_term)
                    .map(|word| format!("{stemmed}:{word}")),
            );
        }
    }

    if clauses.is_empty() {
        log::debug!("free-text value {value:?} on '{}' has no terms", field.name);
        return String::new();
    }

    let prefix = if negated { "-" } else { "" };
    format!("{prefix}({}){}", clauses.join(" AND "), field.boost_suffix())
}

/// Escapes a dangling backslash so it cannot swallow the closing quote.
fn close_escapes(phrase: &str) -> String {
    let trailing = phrase.bytes().rev().take_while(|&b| b == b'\\').count();
    if trailing % 2 == 1 {
        format!("{phrase}\\")
    } else {
        phrase.to_string()
    }
}
