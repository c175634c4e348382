//! Comparison-expression grammar and AST for disco.
//!
//! Search expressions are boolean combinations of field comparisons:
//!
//! - **Comparisons**: `title==Bible` - a field, an operator and one or more values
//! - **Lists**: `format=in=(quarto,folio)` - any of several values
//! - **Ranges**: `year=ge=1500`, `year<1600` - open-ended ranges
//! - **AND**: `a==1;b==2` or `a==1 and b==2`
//! - **OR**: `a==1,b==2` or `a==1 or b==2`
//! - **Grouping**: `(a==1,b==2);c==3` - precedence control
//! - **Quoting**: `title=="Codex Gigas"` - values with spaces or reserved characters
//!
//! # Example
//!
//! ```
//! use disco_query::parse;
//!
//! let expr = parse("title==Bible;year=ge=1500").unwrap();
//! assert!(expr.is_some());
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::{Comparison, Expr, Operator};
pub use error::{LexError, ParseError, QueryError, QueryErrorKind};
pub use lexer::{Token, tokenize};
pub use parser::parse;
