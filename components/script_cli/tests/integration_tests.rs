//! Integration tests for the complete CLI workflow
//!
//! These tests verify end-to-end behavior of the CLI

use parser::ParserOptions;
use script_cli::{Checker, Cli, CliError, OutputFormat};
use std::fs;
use tempfile::TempDir;

/// Test complete workflow: CLI parsing -> Checker creation -> File check
#[test]
fn integration_file_check_workflow() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("clean.cs");
    fs::write(
        &file_path,
        "function double(n: number): number {\n  return n * 2\n}\nlet x = double(21)\n",
    )
    .unwrap();

    let cli = Cli::with_file(file_path.to_str().unwrap());
    let checker = Checker::from_cli(&cli);
    let report = checker.check_file(cli.file.as_ref().unwrap()).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.exit_code(), 0);
}

/// Test a file with semantic problems
#[test]
fn integration_file_with_diagnostics() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("problems.cs");
    fs::write(&file_path, "while true { let y = 1 }\nlet z = y\nreturn z\n").unwrap();

    let checker = Checker::new(ParserOptions::default());
    let report = checker.check_file(file_path.to_str().unwrap()).unwrap();

    let messages: Vec<_> = report.diagnostics().iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["'y' is not defined", "return outside of function"]);
    assert_eq!(report.exit_code(), 1);

    let text = report.render(OutputFormat::Text).unwrap();
    assert!(text.contains("error:2:9: 'y' is not defined\n  let z = y\n          ^"));
}

/// Test missing file error
#[test]
fn integration_missing_file_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.cs");

    let checker = Checker::new(ParserOptions::default());
    let err = checker.check_file(path.to_str().unwrap()).unwrap_err();

    assert!(matches!(err, CliError::IoError(_)));
    assert_eq!(err.exit_code(), 2);
}

/// Test syntax error handling
#[test]
fn integration_syntax_error_handling() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("broken.cs");
    fs::write(&file_path, "let r = embed(a) {\n  if (a) {\n").unwrap();

    let checker = Checker::new(ParserOptions::default());
    let report = checker.check_file(file_path.to_str().unwrap()).unwrap();

    assert_eq!(report.exit_code(), 1);
    let json: serde_json::Value =
        serde_json::from_str(&report.render(OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json["parse_error"]["message"], "Unterminated foreign code block");
    assert_eq!(json["parse_error"]["position"]["column"], 18);
}

/// Test globals from the command line reach the analyzer
#[test]
fn integration_cli_globals() {
    let cli = Cli {
        globals: vec!["print".to_string()],
        ..Cli::with_eval("print(ai(\"hello\"))")
    };
    let checker = Checker::from_cli(&cli);
    let report = checker.check_source(cli.eval.as_ref().unwrap()).unwrap();
    assert!(report.is_clean());

    let without = Checker::new(ParserOptions::default())
        .check_source(cli.eval.as_ref().unwrap())
        .unwrap();
    assert_eq!(without.diagnostics()[0].message, "'print' is not defined");
}

/// Test max depth from the command line reaches the parser
#[test]
fn integration_cli_max_depth() {
    let cli = Cli {
        max_depth: 4,
        ..Cli::with_eval("let a = [[[[[1]]]]]")
    };
    let report = Checker::from_cli(&cli)
        .check_source(cli.eval.as_ref().unwrap())
        .unwrap();
    let err = report.into_outcome().unwrap_err();
    match err {
        CliError::ParseError(e) => assert_eq!(e.kind, core_types::ErrorKind::NestingLimit),
        other => panic!("expected parse error, got {:?}", other),
    }
}

/// Test UTF-8 source positions in rendered output
#[test]
fn integration_utf8_file_content() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("utf8.cs");
    fs::write(&file_path, "let grüße = \"héllo\"\nlet n = grüße + später\n").unwrap();

    let checker = Checker::new(ParserOptions::default());
    let report = checker.check_file(file_path.to_str().unwrap()).unwrap();
    let diagnostics = report.diagnostics();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "'später' is not defined");
    assert_eq!(diagnostics[0].position().column, 17);
}

/// Test checker reuse across sources
#[test]
fn integration_checker_reuse() {
    let checker = Checker::new(ParserOptions::default());

    assert!(checker.check_source("let a = 1").unwrap().is_clean());
    // Declarations from earlier sources do not leak into later ones
    assert!(!checker.check_source("a").unwrap().is_clean());
}
