//! svcgen CLI library.
//!
//! Drives the pipeline from the command line: reads a parsed declaration
//! (JSON), builds the service model, runs the artifacts configured in
//! `svcgen.toml`, and persists the results.
//!
//! # Architecture
//!
//! - `generate` - Build the model and write configured artifacts
//! - `inspect` - Print the resolved service model
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! # Write artifacts under ./gen
//! svcgen generate users.json --config svcgen.toml --out gen
//!
//! # Preview without touching the filesystem
//! svcgen --format json generate users.json --dry-run
//!
//! # Show the resolved model
//! svcgen inspect users.json
//! ```

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unnecessary_wraps)] // commands share the Result-returning signature

pub mod cli;
pub mod commands;
pub mod config;
pub mod formatters;
pub mod output;
pub mod runner;
