//! Core types shared by the Corten Script front end.
//!
//! This crate provides source location tracking and the fail-fast error type
//! used by the lexer and parser.
//!
//! # Overview
//!
//! - [`SourcePosition`] - Line, column and byte offset in source text
//! - [`Span`] - Start/end pair carried by every token, node and diagnostic
//! - [`ParseError`] - Fatal lexing or parsing error
//! - [`ErrorKind`] - Classification of a [`ParseError`]
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, ParseError, SourcePosition};
//!
//! let error = ParseError {
//!     kind: ErrorKind::Syntax,
//!     message: "'else' without preceding 'if'".to_string(),
//!     position: SourcePosition::START,
//! };
//! assert_eq!(error.position.line, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;

pub use error::{ErrorKind, ParseError};
pub use source::{SourcePosition, Span};
