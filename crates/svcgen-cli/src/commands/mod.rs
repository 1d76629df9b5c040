//! Command implementations for the svcgen CLI.
//!
//! Each command module loads its inputs, runs the pipeline, and formats
//! output according to the requested format.

pub mod common;
pub mod completions;
pub mod generate;
pub mod inspect;
