//! `svcgen completions <shell>`: prints a completion script to stdout.

use anyhow::Result;
use clap::Command;
use clap_complete::Shell;
use std::io::{self, Write};
use svcgen_core::cli::ExitCode;
use tracing::debug;

/// Writes the completion script for `cmd` into `out`.
///
/// The script completes the binary name `cmd` was built with.
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use clap_complete::Shell;
/// use svcgen_cli::commands::completions;
///
/// let mut cmd = Command::new("svcgen").subcommand(Command::new("inspect"));
/// let mut script = Vec::new();
/// completions::write_completions(Shell::Bash, &mut cmd, &mut script);
/// assert!(String::from_utf8(script).unwrap().contains("inspect"));
/// ```
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let bin = cmd.get_name().to_string();
    debug!(%shell, %bin, "writing completions");
    clap_complete::generate(shell, cmd, bin, out);
}

/// Runs the completions command.
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_completions(shell, cmd, &mut lock);
    lock.flush()?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn script(shell: Shell) -> String {
        let mut cmd = crate::cli::Cli::command();
        let mut out = Vec::new();
        write_completions(shell, &mut cmd, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_scripts_cover_subcommands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
            let script = script(shell);
            assert!(script.contains("svcgen"), "{shell}");
            assert!(script.contains("generate"), "{shell}");
            assert!(script.contains("inspect"), "{shell}");
        }
    }

    #[test]
    fn test_generate_flags_completed() {
        assert!(script(Shell::Bash).contains("--dry-run"));
    }
}
