//! Source position and span types for Corten Script diagnostics.
//!
//! Every token, AST node, parse error and diagnostic refers back to the
//! source text through these types.

use serde::Serialize;
use std::fmt;

/// Represents a position in source code.
///
/// Lines and columns are 1-indexed; the column counts characters, not bytes.
///
/// # Examples
///
/// ```
/// use core_types::SourcePosition;
///
/// let pos = SourcePosition {
///     line: 10,
///     column: 5,
///     offset: 150,
/// };
///
/// assert_eq!(pos.line, 10);
/// assert_eq!(pos.to_string(), "line 10, column 5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourcePosition {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed, in characters)
    pub column: u32,
    /// Byte offset from the start of the source text
    pub offset: usize,
}

impl SourcePosition {
    /// Position of the first character of a source text
    pub const START: SourcePosition = SourcePosition {
        line: 1,
        column: 1,
        offset: 0,
    };

    /// Create a new position
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A half-open range of source text, `start` inclusive and `end` exclusive.
///
/// # Examples
///
/// ```
/// use core_types::{SourcePosition, Span};
///
/// let span = Span::new(SourcePosition::new(1, 1, 0), SourcePosition::new(1, 4, 3));
/// assert_eq!(span.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    /// First position covered by the span
    pub start: SourcePosition,
    /// Position just past the end of the span
    pub end: SourcePosition,
}

impl Span {
    /// Create a span from two positions
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }

    /// Span covering both `self` and `other`
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// True if the span covers no text
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The source text covered by this span
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        source
            .get(self.start.offset..self.end.offset)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_position_creation() {
        let pos = SourcePosition {
            line: 10,
            column: 5,
            offset: 150,
        };
        assert_eq!(pos.line, 10);
        assert_eq!(pos.column, 5);
        assert_eq!(pos.offset, 150);
    }

    #[test]
    fn test_positions_order_by_line_then_column() {
        let a = SourcePosition::new(1, 9, 8);
        let b = SourcePosition::new(2, 1, 10);
        assert!(a < b);
    }

    #[test]
    fn test_span_merge_and_slice() {
        let source = "let x = 1";
        let left = Span::new(SourcePosition::new(1, 1, 0), SourcePosition::new(1, 4, 3));
        let right = Span::new(SourcePosition::new(1, 9, 8), SourcePosition::new(1, 10, 9));
        let merged = left.to(right);
        assert_eq!(merged.slice(source), "let x = 1");
        assert_eq!(Span::new(SourcePosition::START, SourcePosition::START).len(), 0);
    }
}
