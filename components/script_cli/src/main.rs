//! Corten Script CLI
//!
//! Entry point for the script checker. Parses CLI arguments and delegates
//! to the Checker.

use clap::Parser as ClapParser;
use script_cli::{Checker, Cli, CliResult, Report};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let checker = Checker::from_cli(&cli);

    let result = if let Some(file) = &cli.file {
        tracing::debug!(file = %file, "checking file");
        checker.check_file(file).and_then(|report| emit(&cli, &report))
    } else if let Some(code) = &cli.eval {
        checker.check_source(code).and_then(|report| emit(&cli, &report))
    } else if cli.repl {
        script_cli::repl::run_repl(&checker).map(|()| 0)
    } else {
        eprintln!("Corten Script v{}", env!("CARGO_PKG_VERSION"));
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  corten-script --file <FILE>     Check a script file");
        eprintln!("  corten-script --eval <CODE>     Check inline source code");
        eprintln!("  corten-script --repl            Start interactive REPL");
        eprintln!();
        eprintln!("Run 'corten-script --help' for more options.");
        Ok(2)
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Print a report and return its exit code
fn emit(cli: &Cli, report: &Report) -> CliResult<u8> {
    let output = report.render(cli.format)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(report.exit_code())
}
