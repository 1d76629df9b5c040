//! Command execution and runtime logic.
//!
//! Contains the command dispatch and logging initialization.

use anyhow::Result;
use svcgen_core::cli::{ExitCode, OutputFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Commands;
use crate::commands;

/// Initializes logging infrastructure.
///
/// `--verbose` forces the debug level; otherwise `RUST_LOG` applies,
/// falling back to `info`. Logs go to stderr so stdout stays parseable.
///
/// # Errors
///
/// Returns an error if logging initialization fails.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

/// Executes the specified CLI command.
///
/// Routes commands to their respective handlers and returns an exit code.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn execute_command(command: Commands, output_format: OutputFormat) -> Result<ExitCode> {
    match command {
        Commands::Generate {
            declaration,
            config,
            out,
            dry_run,
        } => commands::generate::run(&declaration, config.as_deref(), &out, dry_run, output_format),
        Commands::Inspect {
            declaration,
            config,
        } => commands::inspect::run(&declaration, config.as_deref(), output_format),
        Commands::Completions { shell } => {
            use crate::cli::Cli;
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}
