//! Semantic diagnostics and source snippet rendering

use core_types::{ParseError, SourcePosition, Span};
use serde::Serialize;
use std::fmt;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The program is invalid
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A problem found by the semantic analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Human-readable message
    pub message: String,
    /// Offending source range; `span.start` is the reported position
    pub span: Span,
    /// Severity
    pub severity: Severity,
}

impl Diagnostic {
    /// Create an error diagnostic
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            severity: Severity::Error,
        }
    }

    /// Reported position
    pub fn position(&self) -> SourcePosition {
        self.span.start
    }

    /// Render with the offending source line and a caret
    pub fn render(&self, source: &str) -> String {
        render_snippet(source, self.severity, self.position(), &self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}", self.severity, self.message, self.position())
    }
}

/// Render a parse error the same way as a [`Diagnostic`]
pub fn render_parse_error(error: &ParseError, source: &str) -> String {
    render_snippet(source, Severity::Error, error.position, &error.message)
}

fn render_snippet(
    source: &str,
    severity: Severity,
    position: SourcePosition,
    message: &str,
) -> String {
    let line_text = source
        .lines()
        .nth((position.line as usize).saturating_sub(1))
        .unwrap_or("");
    // keep tabs so the caret lines up under the reported column
    let padding: String = line_text
        .chars()
        .take((position.column as usize).saturating_sub(1))
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();

    format!(
        "{}:{}:{}: {}\n  {}\n  {}^",
        severity, position.line, position.column, message, line_text, padding
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_at(line: u32, column: u32, offset: usize, len: usize) -> Span {
        Span::new(
            SourcePosition::new(line, column, offset),
            SourcePosition::new(line, column + len as u32, offset + len),
        )
    }

    #[test]
    fn test_render_points_at_column() {
        let source = "let a = 1\nlet b = missing";
        let diag = Diagnostic::error("'missing' is not defined", span_at(2, 9, 18, 7));
        assert_eq!(
            diag.render(source),
            "error:2:9: 'missing' is not defined\n  let b = missing\n          ^"
        );
    }

    #[test]
    fn test_render_preserves_tabs() {
        let source = "\tx";
        let diag = Diagnostic::error("'x' is not defined", span_at(1, 2, 1, 1));
        assert!(diag.render(source).ends_with("\n  \t^"));
    }

    #[test]
    fn test_render_parse_error() {
        let err = ParseError::syntax("Unexpected token '='", SourcePosition::new(1, 1, 0));
        assert_eq!(
            render_parse_error(&err, "= 1"),
            "error:1:1: Unexpected token '='\n  = 1\n  ^"
        );
    }

    #[test]
    fn test_display_and_serialize() {
        let diag = Diagnostic::error("break outside of loop", span_at(1, 1, 0, 5));
        assert_eq!(
            diag.to_string(),
            "error: break outside of loop at line 1, column 1"
        );
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["severity"], "error");
        assert_eq!(json["span"]["start"]["line"], 1);
    }
}
