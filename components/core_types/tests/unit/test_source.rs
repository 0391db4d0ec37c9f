//! Unit tests for SourcePosition and Span

use core_types::{SourcePosition, Span};

#[cfg(test)]
mod source_position_tests {
    use super::*;

    #[test]
    fn test_source_position_default_is_start() {
        assert_eq!(SourcePosition::default(), SourcePosition::START);
        assert_eq!(SourcePosition::START, SourcePosition::new(1, 1, 0));
    }

    #[test]
    fn test_source_position_display() {
        let pos = SourcePosition::new(12, 4, 300);
        assert_eq!(format!("{}", pos), "line 12, column 4");
    }

    #[test]
    fn test_source_position_serializes_all_fields() {
        let json = serde_json::to_value(SourcePosition::new(3, 2, 20)).unwrap();
        assert_eq!(json, serde_json::json!({ "line": 3, "column": 2, "offset": 20 }));
    }
}

#[cfg(test)]
mod span_tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span::new(
            SourcePosition::new(1, start as u32 + 1, start),
            SourcePosition::new(1, end as u32 + 1, end),
        )
    }

    #[test]
    fn test_span_merge_is_order_independent() {
        let a = span(2, 5);
        let b = span(8, 9);
        assert_eq!(a.to(b), b.to(a));
        assert_eq!(a.to(b), span(2, 9));
    }

    #[test]
    fn test_span_slice_uses_byte_offsets() {
        let source = "let ü = 1";
        let name = Span::new(SourcePosition::new(1, 5, 4), SourcePosition::new(1, 6, 6));
        assert_eq!(name.slice(source), "ü");
        assert_eq!(name.len(), 2);
    }

    #[test]
    fn test_span_slice_out_of_range_is_empty() {
        assert_eq!(span(10, 20).slice("short"), "");
    }

    #[test]
    fn test_empty_span() {
        let position = SourcePosition::new(4, 1, 30);
        let at = Span::new(position, position);
        assert!(at.is_empty());
        assert_eq!(at.start, at.end);
    }
}
