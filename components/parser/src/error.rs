//! Parser error types and helpers

use crate::lexer::Token;
use core_types::{ErrorKind, ParseError, SourcePosition};

/// Create a syntax error at a given position
pub fn syntax_error(message: impl Into<String>, position: SourcePosition) -> ParseError {
    ParseError::syntax(message, position)
}

/// Create an unexpected token error at the token's position
pub fn unexpected_token(expected: &str, got: &Token) -> ParseError {
    syntax_error(
        format!("Expected {}, found {}", expected, got.describe()),
        got.position,
    )
}

/// Create an error for input nested deeper than `limit`
pub fn nesting_limit(limit: usize, position: SourcePosition) -> ParseError {
    ParseError::new(
        ErrorKind::NestingLimit,
        format!("Nesting exceeds the maximum depth of {}", limit),
        position,
    )
}
