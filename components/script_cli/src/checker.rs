//! Check orchestration for Corten Script sources
//!
//! The Checker struct runs the front end over a source text:
//! - Lexer for `--print-tokens`
//! - Parser with the configured nesting limit
//! - SemanticAnalyzer seeded with runtime globals

use crate::cli::{Cli, OutputFormat};
use crate::error::CliResult;
use core_types::ParseError;
use parser::{
    parse_with_options, render_parse_error, Diagnostic, Lexer, ParserOptions, Program,
    SemanticAnalyzer,
};
use serde::Serialize;
use tracing::{debug, instrument};

/// Runs parsing and analysis with a fixed configuration
#[derive(Debug, Clone)]
pub struct Checker {
    /// Parser configuration
    options: ParserOptions,
    /// Names treated as declared before the script runs
    globals: Vec<String>,
    /// Whether to print tokens before parsing
    print_tokens: bool,
    /// Whether to print the AST after parsing
    print_ast: bool,
    /// Format for the AST dump
    format: OutputFormat,
}

impl Checker {
    /// Create a new checker
    ///
    /// # Example
    /// ```
    /// use parser::ParserOptions;
    /// use script_cli::Checker;
    ///
    /// let checker = Checker::new(ParserOptions::default());
    /// let report = checker.check_source("let x = 1").unwrap();
    /// assert!(report.is_clean());
    /// ```
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            globals: Vec::new(),
            print_tokens: false,
            print_ast: false,
            format: OutputFormat::Text,
        }
    }

    /// Build a checker from command line arguments
    pub fn from_cli(cli: &Cli) -> Self {
        Self::new(ParserOptions::default().with_max_depth(cli.max_depth))
            .with_globals(cli.globals.iter().cloned())
            .with_print_tokens(cli.print_tokens)
            .with_print_ast(cli.print_ast)
            .with_format(cli.format)
    }

    /// Add runtime-provided global names
    pub fn with_globals(mut self, globals: impl IntoIterator<Item = String>) -> Self {
        self.globals.extend(globals);
        self
    }

    /// Enable token printing
    pub fn with_print_tokens(mut self, enabled: bool) -> Self {
        self.print_tokens = enabled;
        self
    }

    /// Enable AST printing
    pub fn with_print_ast(mut self, enabled: bool) -> Self {
        self.print_ast = enabled;
        self
    }

    /// Set the format used for AST dumps
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Check a script file
    ///
    /// # Errors
    /// Returns `CliError` if the file cannot be read
    #[instrument(level = "debug", skip(self))]
    pub fn check_file(&self, path: &str) -> CliResult<Report> {
        let source = std::fs::read_to_string(path)?;
        self.check_source(&source)
    }

    /// Check a source string
    pub fn check_source(&self, source: &str) -> CliResult<Report> {
        self.check_with_globals(source, &[])
    }

    /// Check a source string with additional declared names
    pub fn check_with_globals(&self, source: &str, extra: &[String]) -> CliResult<Report> {
        self.check_parsed(source, self.parse(source), extra)
    }

    /// Parse with the configured options, without dumps or analysis
    pub fn parse(&self, source: &str) -> Result<Program, ParseError> {
        parse_with_options(source, self.options)
    }

    /// Finish checking `source` from an earlier [`Checker::parse`] result
    pub fn check_parsed(
        &self,
        source: &str,
        parsed: Result<Program, ParseError>,
        extra: &[String],
    ) -> CliResult<Report> {
        if self.print_tokens {
            println!("{}", dump_tokens(source));
        }

        let outcome = match parsed {
            Ok(program) => {
                if self.print_ast {
                    println!("{}", self.dump_ast(&program)?);
                }
                let diagnostics = SemanticAnalyzer::new()
                    .with_globals(self.globals.iter().chain(extra).cloned())
                    .analyze(&program);
                debug!(diagnostics = diagnostics.len(), "checked source");
                Ok((program, diagnostics))
            }
            Err(error) => Err(error),
        };

        Ok(Report {
            source: source.to_string(),
            outcome,
        })
    }

    fn dump_ast(&self, program: &Program) -> CliResult<String> {
        match self.format {
            OutputFormat::Text => Ok(format!("AST: {:#?}", program)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(program)?),
        }
    }
}

/// One line per token: `line:column<TAB>description`
fn dump_tokens(source: &str) -> String {
    match Lexer::new(source).tokenize() {
        Ok(tokens) => tokens
            .iter()
            .map(|t| format!("{}:{}\t{}", t.position.line, t.position.column, t.describe()))
            .collect::<Vec<_>>()
            .join("\n"),
        Err(error) => format!("tokens unavailable: {}", error),
    }
}

/// Result of checking one source text
#[derive(Debug, Clone)]
pub struct Report {
    /// The checked source
    pub source: String,
    /// Parsed program with its diagnostics, or the parse error
    pub outcome: Result<(Program, Vec<Diagnostic>), ParseError>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    ok: bool,
    parse_error: Option<&'a ParseError>,
    diagnostics: &'a [Diagnostic],
}

impl Report {
    /// True if the source parsed and produced no diagnostics
    pub fn is_clean(&self) -> bool {
        matches!(&self.outcome, Ok((_, diagnostics)) if diagnostics.is_empty())
    }

    /// Diagnostics found, empty if parsing failed
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match &self.outcome {
            Ok((_, diagnostics)) => diagnostics,
            Err(_) => &[],
        }
    }

    /// Process exit code: 0 clean, 1 otherwise
    pub fn exit_code(&self) -> u8 {
        if self.is_clean() {
            0
        } else {
            1
        }
    }

    /// Take the parsed program and diagnostics
    ///
    /// # Errors
    /// Returns `CliError::ParseError` if parsing failed
    pub fn into_outcome(self) -> CliResult<(Program, Vec<Diagnostic>)> {
        Ok(self.outcome?)
    }

    /// Render the report for output
    pub fn render(&self, format: OutputFormat) -> CliResult<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => {
                let (parse_error, diagnostics) = match &self.outcome {
                    Ok((_, diagnostics)) => (None, diagnostics.as_slice()),
                    Err(error) => (Some(error), &[][..]),
                };
                let report = JsonReport {
                    ok: self.is_clean(),
                    parse_error,
                    diagnostics,
                };
                Ok(serde_json::to_string_pretty(&report)?)
            }
        }
    }

    fn render_text(&self) -> String {
        match &self.outcome {
            Err(error) => render_parse_error(error, &self.source),
            Ok((_, diagnostics)) if diagnostics.is_empty() => String::new(),
            Ok((_, diagnostics)) => {
                let mut out: Vec<String> = diagnostics
                    .iter()
                    .map(|d| d.render(&self.source))
                    .collect();
                let plural = if diagnostics.len() == 1 { "" } else { "s" };
                out.push(format!("{} error{} found", diagnostics.len(), plural));
                out.join("\n\n")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_checker_builder_pattern() {
        let checker = Checker::new(ParserOptions::default())
            .with_print_tokens(true)
            .with_print_ast(true)
            .with_format(OutputFormat::Json)
            .with_globals(vec!["print".to_string()]);

        assert!(checker.print_tokens);
        assert!(checker.print_ast);
        assert_eq!(checker.format, OutputFormat::Json);
        assert_eq!(checker.globals, vec!["print".to_string()]);
    }

    #[test]
    fn test_from_cli() {
        let cli = Cli {
            globals: vec!["env".to_string()],
            max_depth: 4,
            ..Cli::with_eval("env")
        };
        let checker = Checker::from_cli(&cli);
        assert_eq!(checker.options.max_depth, 4);
        assert!(checker.check_source("env").unwrap().is_clean());
    }

    #[test]
    fn test_clean_report() {
        let report = Checker::new(ParserOptions::default())
            .check_source("let x = 1\nx")
            .unwrap();
        assert!(report.is_clean());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.render(OutputFormat::Text).unwrap(), "");
    }

    #[test]
    fn test_report_with_diagnostics() {
        let report = Checker::new(ParserOptions::default())
            .check_source("return missing")
            .unwrap();
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.diagnostics().len(), 2);

        let text = report.render(OutputFormat::Text).unwrap();
        assert!(text.starts_with("error:1:1: return outside of function\n  return missing\n  ^"));
        assert!(text.ends_with("2 errors found"));
    }

    #[test]
    fn test_report_with_parse_error() {
        let report = Checker::new(ParserOptions::default())
            .check_source("let = 1")
            .unwrap();
        assert_eq!(report.exit_code(), 1);
        assert!(report.diagnostics().is_empty());
        assert!(report
            .render(OutputFormat::Text)
            .unwrap()
            .starts_with("error:1:5: Expected identifier after 'let', found '='"));
        assert!(matches!(report.into_outcome(), Err(CliError::ParseError(_))));
    }

    #[test]
    fn test_json_report() {
        let report = Checker::new(ParserOptions::default())
            .check_source("if 1 { }")
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&report.render(OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["ok"], false);
        assert!(json["parse_error"].is_null());
        assert_eq!(
            json["diagnostics"][0]["message"],
            "if condition must be boolean, got number"
        );
        assert_eq!(json["diagnostics"][0]["span"]["start"]["column"], 4);
    }

    #[test]
    fn test_json_parse_error() {
        let report = Checker::new(ParserOptions::default())
            .check_source("f(a,)")
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&report.render(OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["parse_error"]["kind"], "Syntax");
        assert_eq!(json["parse_error"]["message"], "Trailing ',' in argument list");
        assert_eq!(json["diagnostics"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_extra_globals() {
        let checker = Checker::new(ParserOptions::default());
        let report = checker
            .check_with_globals("total + 1", &["total".to_string()])
            .unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_check_parsed_uses_given_result() {
        let checker = Checker::new(ParserOptions::default().with_max_depth(2));
        let parsed = checker.parse("let a = [[[1]]]");
        assert!(parsed.is_err());

        let report = checker.check_parsed("let a = [[[1]]]", parsed, &[]).unwrap();
        assert!(report
            .render(OutputFormat::Text)
            .unwrap()
            .contains("Nesting exceeds the maximum depth of 2"));
    }

    #[test]
    fn test_dump_tokens() {
        assert_eq!(
            dump_tokens("let x"),
            "1:1\tkeyword 'let'\n1:5\tidentifier 'x'\n1:6\tend of input"
        );
    }
}
