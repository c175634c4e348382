//! Text utilities shared by the disco query pipeline.
//!
//! - [`tokenize_phrase`] splits a raw search phrase into quoted and unquoted segments.
//! - [`merge_spellcheck`] folds a spellchecker's flat correction back into the original
//!   phrase without touching quoted segments.
//! - [`BoundaryCalculator`] moves snippet edges onto word boundaries.
//! - [`SnippetBuilder`] picks highlighted fragments around search term matches.
//!
//! Everything here is a pure function of its input. Offsets are byte offsets into the
//! original string and always fall on `char` boundaries.

#![warn(missing_docs)]

mod boundary;
mod snippet;
mod spellcheck;
mod tokenize;

pub use boundary::{BoundaryCalculator, DEFAULT_DIVIDERS, SnippetWindow};
pub use snippet::{Snippet, SnippetBuilder};
pub use spellcheck::{merge_spellcheck, spellcheck_query};
pub use tokenize::{Segment, tokenize_phrase};
