//! REPL (Read-Eval-Print Loop) implementation
//!
//! Each complete input is checked against the names declared by earlier
//! inputs, so `let x = 1` followed by `x + 1` reports nothing.

use crate::checker::Checker;
use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};
use core_types::{ErrorKind, ParseError};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Names declared so far in a REPL session
#[derive(Debug, Default)]
pub struct Session {
    declared: Vec<String>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Names accepted from earlier inputs
    pub fn declared(&self) -> &[String] {
        &self.declared
    }

    /// Forget all accepted names
    pub fn reset(&mut self) {
        self.declared.clear();
    }

    /// Check one input and remember its top-level declarations if it
    /// parsed. Returns the rendered output, empty when clean, or `None`
    /// when the input stops short and more lines are expected.
    pub fn evaluate(&mut self, checker: &Checker, input: &str) -> CliResult<Option<String>> {
        let parsed = checker.parse(input);
        if let Err(error) = &parsed {
            if needs_more_input(error, input) {
                return Ok(None);
            }
        }

        let report = checker.check_parsed(input, parsed, &self.declared)?;
        if let Ok((program, _)) = &report.outcome {
            for name in program.declared_names() {
                if !self.declared.iter().any(|known| known == name) {
                    self.declared.push(name.to_string());
                }
            }
        }
        report.render(OutputFormat::Text).map(Some)
    }
}

/// Run the interactive REPL
///
/// # Returns
/// `Ok(())` when REPL exits normally
pub fn run_repl(checker: &Checker) -> CliResult<()> {
    let mut editor = DefaultEditor::new()
        .map_err(|e| CliError::ReplError(format!("Failed to initialize editor: {}", e)))?;

    println!("Corten Script v{}", env!("CARGO_PKG_VERSION"));
    println!("Type Corten Script code or 'exit' to quit.");
    println!();

    let mut session = Session::new();
    let mut line_buffer = String::new();
    let mut in_multiline = false;

    loop {
        let prompt = if in_multiline { "... " } else { "> " };

        match editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if !in_multiline && matches!(trimmed, "exit" | ".exit" | "quit") {
                    println!("Goodbye!");
                    break;
                }

                if !in_multiline && trimmed.starts_with('.') {
                    handle_repl_command(trimmed, &mut session);
                    continue;
                }

                if in_multiline {
                    line_buffer.push('\n');
                }
                line_buffer.push_str(&line);

                if !is_input_complete(&line_buffer) {
                    in_multiline = true;
                    continue;
                }

                match session.evaluate(checker, &line_buffer) {
                    Ok(None) => {
                        in_multiline = true;
                        continue;
                    }
                    Ok(Some(output)) if output.is_empty() => {}
                    Ok(Some(output)) => println!("{}", output),
                    Err(e) => eprintln!("Error: {}", e),
                }

                in_multiline = false;
                let _ = editor.add_history_entry(line_buffer.as_str());

                line_buffer.clear();
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                if in_multiline {
                    println!("^C");
                    line_buffer.clear();
                    in_multiline = false;
                } else {
                    println!("Press Ctrl-D or type 'exit' to quit");
                }
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                return Err(CliError::ReplError(format!("Readline error: {}", err)));
            }
        }
    }

    Ok(())
}

/// Handle special REPL commands
fn handle_repl_command(command: &str, session: &mut Session) {
    match command {
        ".help" => {
            println!("REPL Commands:");
            println!("  .help     - Show this help message");
            println!("  .clear    - Clear the screen");
            println!("  .reset    - Forget earlier declarations");
            println!("  .exit     - Exit the REPL");
            println!("  exit      - Exit the REPL");
            println!("  quit      - Exit the REPL");
        }
        ".clear" => {
            print!("\x1B[2J\x1B[1;1H");
        }
        ".reset" => {
            session.reset();
            println!("Declarations cleared");
        }
        _ => {
            println!("Unknown command: {}", command);
            println!("Type .help for available commands");
        }
    }
}

/// Parse errors at the very end mean the input is still being typed
fn needs_more_input(error: &ParseError, input: &str) -> bool {
    let at_end = error.position.offset >= input.trim_end().len();
    (error.kind == ErrorKind::Syntax && at_end) || error.message == "Unterminated template literal"
}

/// Check if the input appears to be complete
///
/// Counts `{}`, `[]` and `()` outside of string literals and comments.
fn is_input_complete(input: &str) -> bool {
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            match c {
                '\\' => {
                    chars.next();
                }
                // a raw newline ends a quoted string; the parser reports it
                '\n' if q != '`' => quote = None,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }

        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '/' if chars.peek() == Some(&'/') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
            }
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth -= 1,
            _ => {}
        }
    }

    depth <= 0 && quote != Some('`')
}
