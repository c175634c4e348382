//! Compiles disco search requests into engine query strings.
//!
//! - [`QueryCompiler`] turns a comparison expression (`title==Bible;year=ge=1500`) into
//!   a Lucene-style query and reports which fields it searched.
//! - [`FilterBuilder`] turns a JSON facet specification into tagged filter clauses.
//!
//! Both read field metadata through [`disco_config::FieldProvider`] and hold no state
//! between calls.
//!
//! # Example
//!
//! ```
//! use disco_compile::QueryCompiler;
//! use disco_config::{FieldOptions, Schema};
//!
//! let schema = Schema::default().with_field(
//!     "title",
//!     FieldOptions { boost: Some(2.0), ..FieldOptions::default() },
//! );
//! let compiled = QueryCompiler::new(&schema)
//!     .compile_str("title==Bible")
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(compiled.query, "title:\"Bible\"^2.0");
//! ```

#![warn(missing_docs)]

mod compile;
mod error;
mod filter;
mod freetext;

pub use compile::{CompiledQuery, QueryCompiler, quote, quote_value};
pub use error::{CompileError, FilterError};
pub use filter::{FilterBuilder, FilterQueries};
pub use freetext::{build_free_text, escape_term, is_free_text};
