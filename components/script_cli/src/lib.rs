//! Corten Script CLI Library
//!
//! Provides the Checker struct and supporting modules for the script CLI.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checker;
pub mod cli;
pub mod error;
pub mod repl;

pub use checker::{Checker, Report};
pub use cli::{Cli, OutputFormat};
pub use error::{CliError, CliResult};
