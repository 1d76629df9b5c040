//! CLI argument definitions and parsing.
//!
//! Defines the command-line interface structure using clap:
//! - `Cli` - Main CLI entry point
//! - `Commands` - Available subcommands

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// svcgen - declarative code generation from annotated service interfaces.
///
/// Reads a parsed interface declaration, resolves doc-comment tags into a
/// service model, and renders the artifacts configured in `svcgen.toml`.
#[derive(Parser, Debug)]
#[command(name = "svcgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    pub format: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the service model and write configured artifacts.
    ///
    /// Every interface in the declaration is built on its own: a tag error
    /// in one interface does not stop the others. Each configured artifact
    /// runs independently as well.
    ///
    /// Existing files are replaced only when the artifact sets
    /// `overwrite`; with `merge` the new content is appended unless the
    /// file already contains it; otherwise the file is left alone.
    ///
    /// # Examples
    ///
    /// ```bash
    /// svcgen generate users.json --config svcgen.toml --out gen
    /// svcgen generate users.json --dry-run
    /// ```
    Generate {
        /// Parsed declaration (JSON)
        declaration: PathBuf,

        /// Artifact configuration (TOML)
        #[arg(short, long, env = "SVCGEN_CONFIG")]
        config: Option<PathBuf>,

        /// Output root for generated artifacts
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Report what would be written without touching the filesystem
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the resolved service model.
    ///
    /// Useful for checking how tags were applied: generate flags, aliases,
    /// HTTP routing and log redaction per method.
    Inspect {
        /// Parsed declaration (JSON)
        declaration: PathBuf,

        /// Configuration providing `[model]` conventions (TOML)
        #[arg(short, long, env = "SVCGEN_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Generate shell completions.
    ///
    /// Generates completion scripts for various shells that can be
    /// sourced or saved to enable tab completion for this CLI.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}
