//! Error types for query compilation and filter building.

use disco_query::QueryError;
use thiserror::Error;

/// Errors that reject a whole expression.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The comparison names neither a searchable field nor a field group.
    #[error("invalid field '{field}'")]
    InvalidField {
        /// The offending selector.
        field: String,
    },

    /// The comparison carries the wrong number of arguments for its operator.
    #[error("operator {operator} on '{field}' expects {expected}, got {got}")]
    Arguments {
        /// Field selector.
        field: String,
        /// Operator symbol.
        operator: String,
        /// What the operator accepts.
        expected: &'static str,
        /// Number of arguments supplied.
        got: usize,
    },

    /// The expression text did not parse.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Errors from the filter builder.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The filter specification is not a JSON object.
    #[error("malformed filter specification: {reason}")]
    MalformedRoot {
        /// What was wrong with it.
        reason: String,
    },
}
