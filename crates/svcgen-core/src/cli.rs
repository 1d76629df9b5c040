//! CLI-specific types shared by the `svcgen` binary and its tests.
//!
//! # Examples
//!
//! ```
//! use svcgen_core::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "json".parse().unwrap();
//! assert_eq!(format, OutputFormat::Json);
//! assert!(ExitCode::SUCCESS.is_success());
//! ```

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON for scripts
    Text,
    /// Indented outline
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Every format, in the order `--help` lists them.
    pub const ALL: [Self; 3] = [Self::Json, Self::Text, Self::Pretty];

    /// Name accepted on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::ConfigError {
                message: format!("unknown output format '{s}', use json, text or pretty"),
            })
    }
}

/// Process exit status of `svcgen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Everything was generated.
    pub const SUCCESS: Self = Self(0);

    /// Inputs could not be loaded or outputs could not be written.
    pub const ERROR: Self = Self(1);

    /// Declaration could not be turned into a service model (exit code 2).
    pub const INVALID_INPUT: Self = Self(2);

    /// At least one artifact spec failed; sibling artifacts were still
    /// produced (exit code 3).
    pub const PARTIAL: Self = Self(3);

    /// Raw status value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Returns `true` for [`SUCCESS`](Self::SUCCESS).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
