//! Unit tests for ParseError and ErrorKind

use core_types::{ErrorKind, ParseError, SourcePosition};

#[cfg(test)]
mod parse_error_tests {
    use super::*;

    #[test]
    fn test_constructors_set_kind() {
        let pos = SourcePosition::new(1, 3, 2);
        assert_eq!(ParseError::lex("x", pos).kind, ErrorKind::Lex);
        assert_eq!(ParseError::syntax("x", pos).kind, ErrorKind::Syntax);
        assert_eq!(
            ParseError::new(ErrorKind::NestingLimit, "x", pos).kind,
            ErrorKind::NestingLimit
        );
    }

    #[test]
    fn test_parse_error_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(ParseError::syntax(
            "Unterminated foreign code block",
            SourcePosition::new(2, 9, 14),
        ));
        assert_eq!(
            error.to_string(),
            "Unterminated foreign code block at line 2, column 9"
        );
    }

    #[test]
    fn test_parse_error_serializes() {
        let error = ParseError::lex("Unterminated string literal", SourcePosition::new(1, 9, 8));
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["kind"], "Lex");
        assert_eq!(json["message"], "Unterminated string literal");
        assert_eq!(json["position"]["column"], 9);
    }
}
