//! Front-end error types.
//!
//! Lexing and parsing are fail-fast: the first malformed construct produces a
//! single [`ParseError`] and no AST. Semantic problems are not errors at this
//! level; they are accumulated as diagnostics by the analyzer.

use crate::SourcePosition;
use serde::Serialize;
use thiserror::Error;

/// The kind of front-end error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Unrecognized character or unterminated literal/comment
    Lex,
    /// Structural violation found by the parser
    Syntax,
    /// Input nested deeper than the parser is configured to accept
    NestingLimit,
}

/// A fatal lexing or parsing error with the position where it was detected.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, ParseError, SourcePosition};
///
/// let error = ParseError::syntax("Expected '}' to close block", SourcePosition::new(3, 1, 40));
///
/// assert_eq!(error.kind, ErrorKind::Syntax);
/// assert_eq!(error.to_string(), "Expected '}' to close block at line 3, column 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message} at {position}")]
pub struct ParseError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Source position where the error was detected
    pub position: SourcePosition,
}

impl ParseError {
    /// Create an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
        }
    }

    /// Create a lexical error
    pub fn lex(message: impl Into<String>, position: SourcePosition) -> Self {
        Self::new(ErrorKind::Lex, message, position)
    }

    /// Create a syntax error
    pub fn syntax(message: impl Into<String>, position: SourcePosition) -> Self {
        Self::new(ErrorKind::Syntax, message, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_variants() {
        let _lex = ErrorKind::Lex;
        let _syntax = ErrorKind::Syntax;
        let _limit = ErrorKind::NestingLimit;
    }

    #[test]
    fn test_parse_error_display() {
        let error = ParseError::lex("Unexpected character '#'", SourcePosition::new(2, 7, 12));
        assert!(matches!(error.kind, ErrorKind::Lex));
        assert_eq!(
            error.to_string(),
            "Unexpected character '#' at line 2, column 7"
        );
    }
}
