//! Error types for the CLI

use core_types::ParseError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O error
    #[error("File error: {0}")]
    IoError(#[from] std::io::Error),

    /// Source could not be parsed
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    /// JSON output could not be produced
    #[error("Output error: {0}")]
    OutputError(#[from] serde_json::Error),

    /// REPL error
    #[error("REPL error: {0}")]
    ReplError(String),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::ParseError(_) => 1,
            _ => 2,
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
