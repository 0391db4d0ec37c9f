//! Command line arguments

use clap::{Parser, ValueEnum};
use parser::DEFAULT_MAX_DEPTH;

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable diagnostics with source snippets
    Text,
    /// A single JSON document
    Json,
}

/// Corten Script checker
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "corten-script", version, about = "Parse and check Corten Script source")]
pub struct Cli {
    /// Script file to check
    #[arg(short, long, conflicts_with = "eval")]
    pub file: Option<String>,

    /// Check inline source code
    #[arg(short, long)]
    pub eval: Option<String>,

    /// Start interactive REPL
    #[arg(short, long)]
    pub repl: bool,

    /// Print the token stream before checking
    #[arg(long)]
    pub print_tokens: bool,

    /// Print the AST before checking
    #[arg(long)]
    pub print_ast: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Name provided by the runtime; may be repeated
    #[arg(short, long = "global", value_name = "NAME")]
    pub globals: Vec<String>,

    /// Maximum statement and expression nesting
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

impl Cli {
    /// Arguments for checking a single file
    pub fn with_file(path: impl Into<String>) -> Self {
        Self {
            file: Some(path.into()),
            ..Self::default()
        }
    }

    /// Arguments for checking inline source
    pub fn with_eval(code: impl Into<String>) -> Self {
        Self {
            eval: Some(code.into()),
            ..Self::default()
        }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            file: None,
            eval: None,
            repl: false,
            print_tokens: false,
            print_ast: false,
            format: OutputFormat::Text,
            globals: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
