//! Entry point for the `themeword` binary.
//!
//! Parses arguments with clap, runs the requested command and maps failures to
//! a non-zero exit code. Logging is initialised before anything else so model
//! loading and selection emit structured diagnostics.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use themeword_cli::{
    cli::{Cli, CliError, CommandOutcome, render_words, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let outcome = run_cli(cli).context("failed to execute command")?;
    if let CommandOutcome::Picked(words) = outcome {
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        render_words(&words, &mut writer).context("failed to render words")?;
        writer.flush().context("failed to flush output")?;
    }
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let (code, provider_code) = err
            .downcast_ref::<CliError>()
            .and_then(|cli_error| match cli_error {
                CliError::Selection(selection) => {
                    Some((Some(selection.code()), selection.provider_code()))
                }
                _ => None,
            })
            .unwrap_or((None, None));

        let code_field = code.map(|code| field::display(code.as_str()));
        let provider_code_field = provider_code.map(|code| field::display(code.as_str()));

        error!(
            error = %err,
            code = code_field,
            provider_code = provider_code_field,
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

// Tracing is not installed yet, so this goes straight to stderr.
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
