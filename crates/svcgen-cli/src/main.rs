//! svcgen command-line entry point.

use anyhow::Result;
use clap::Parser;
use svcgen_cli::cli::Cli;
use svcgen_cli::runner::{execute_command, init_logging};
use svcgen_core::cli::OutputFormat;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let exit_code = execute_command(cli.command, output_format)?;

    std::process::exit(exit_code.as_i32());
}
