//! Error types for expression lexing and parsing.

use std::{error, fmt};

use thiserror::Error;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expression syntax error: {message} (at byte {position})")]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in input where error occurred.
    pub position: usize,
    /// The original input string.
    pub input: String,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            position,
            input: input.to_string(),
        }
    }

    /// Formats the error with a position indicator showing where the error occurred.
    pub fn format_with_context(&self) -> String {
        format!(
            "expression syntax error: {}\n  {}\n  {}^",
            self.message,
            self.input,
            " ".repeat(self.position)
        )
    }
}

/// Parse error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Byte position in input where error occurred (if applicable).
    pub position: Option<usize>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(pos) = self.position {
            write!(f, "at byte {}: {}", pos, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl error::Error for ParseError {}

/// A unified error type for expression parsing.
///
/// Carries the original expression so the error can be displayed with a position marker.
#[derive(Debug, Clone)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original expression (if available).
    pub query: Option<String>,
}

/// The specific kind of expression error.
#[derive(Debug, Clone)]
pub enum QueryErrorKind {
    /// Lexer error (tokenization failed).
    Lex {
        /// Error message.
        message: String,
        /// Byte position in input.
        position: usize,
    },
    /// Parser error (invalid syntax).
    Parse {
        /// Error message.
        message: String,
        /// Byte position in input (if available).
        position: Option<usize>,
    },
}

impl QueryError {
    /// Creates a lex error.
    pub fn lex(message: impl Into<String>, position: usize, query: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: message.into(),
                position,
            },
            query: Some(query.into()),
        }
    }

    /// Creates a parse error.
    pub fn parse(
        message: impl Into<String>,
        position: Option<usize>,
        query: Option<String>,
    ) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: message.into(),
                position,
            },
            query,
        }
    }

    /// Sets the expression string for this error.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> &str {
        match &self.kind {
            QueryErrorKind::Lex { message, .. } | QueryErrorKind::Parse { message, .. } => {
                message
            }
        }
    }

    /// Returns the byte position of the error, if known.
    pub fn position(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::Lex { position, .. } => Some(*position),
            QueryErrorKind::Parse { position, .. } => *position,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        let message = self.message();
        if message.contains("unclosed quote") {
            Some("Add a closing quote to complete the value")
        } else if message.contains("closing parenthesis") {
            Some("Add a closing parenthesis ) to match the opening one")
        } else if message.contains("operator") {
            Some("Comparisons look like field==value, field=in=(a,b) or field=ge=1500")
        } else if message.contains("single argument") {
            Some("Only =in= accepts a parenthesized list of values")
        } else {
            None
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "expression syntax error: {}", self.message())?;

        if let Some(query) = &self.query {
            writeln!(f, "  {}", query)?;
            if let Some(pos) = self.position() {
                let clamped = pos.min(query.len());
                writeln!(f, "  {}^", " ".repeat(clamped))?;
            }
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {}", suggestion)?;
        }

        Ok(())
    }
}

impl error::Error for QueryError {}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: err.message,
                position: err.position,
            },
            query: Some(err.input),
        }
    }
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: err.message,
                position: err.position,
            },
            query: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = QueryError::lex("unclosed quote", 7, "title==\"Codex");
        let display = err.to_string();
        assert!(display.contains("unclosed quote"));
        assert!(display.contains("title==\"Codex"));
        assert!(display.contains("       ^"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn parse_error_display() {
        let err = QueryError::parse(
            "expected closing parenthesis",
            Some(10),
            Some("(title==a".to_string()),
        );
        let display = err.to_string();
        assert!(display.contains("expected closing parenthesis"));
        assert!(display.contains("(title==a"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn position_is_clamped_to_query() {
        let err = QueryError::parse("unexpected end of expression", Some(99), None).with_query("a==");
        let display = err.to_string();
        assert!(display.contains("     ^"));
    }

    #[test]
    fn message_extraction() {
        let err = QueryError::lex("test message", 0, "query");
        assert_eq!(err.message(), "test message");
        assert_eq!(err.position(), Some(0));
    }

    #[test]
    fn operator_suggestion() {
        let err = QueryError::parse("expected comparison operator after 'title'", None, None);
        assert!(err.suggestion().unwrap().contains("field==value"));
    }

    #[test]
    fn lex_error_converts_with_input() {
        let err: QueryError = LexError::new("invalid comparison operator", 5, "title=x").into();
        assert_eq!(err.query.as_deref(), Some("title=x"));
        assert_eq!(err.position(), Some(5));
    }
}
