//! Corten Script Parser Component
//!
//! Provides the lexer, parser, AST and semantic analyzer for Corten Script.
//!
//! # Overview
//!
//! - [`Lexer`] - Tokenizes source code on demand
//! - [`Token`] - Tokens with kind, lexeme and position
//! - [`Parser`] - Recursive descent parser producing a [`Program`]
//! - [`Statement`] / [`Expression`] - Abstract Syntax Tree node types
//! - [`SemanticAnalyzer`] - Scope checks producing [`Diagnostic`]s
//!
//! Parsing is fail-fast and returns the first [`ParseError`]. Analysis never
//! fails; it returns every diagnostic it finds.
//!
//! # Example
//!
//! ```
//! use parser::{analyze, parse};
//!
//! let program = parse("let x = 42\nreturn x").unwrap();
//! let diagnostics = analyze(&program);
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].message, "return outside of function");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analyzer;
pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod scope;

pub use analyzer::{analyze, SemanticAnalyzer};
pub use ast::{Expression, Program, Statement};
pub use core_types::{ErrorKind, ParseError, SourcePosition, Span};
pub use diagnostics::{render_parse_error, Diagnostic, Severity};
pub use lexer::{Keyword, Lexer, Punctuator, Token, TokenKind};
pub use parser::{parse, parse_with_options, Parser, ParserOptions, DEFAULT_MAX_DEPTH};
pub use scope::{ScopeKind, ScopeStack};

/// Parse and analyze `source` in one step
pub fn check(source: &str) -> Result<(Program, Vec<Diagnostic>), ParseError> {
    let program = parse(source)?;
    let diagnostics = analyze(&program);
    Ok((program, diagnostics))
}
