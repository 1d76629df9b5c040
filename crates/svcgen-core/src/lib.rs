//! Core types, errors, and configuration for svcgen.
//!
//! This crate provides the foundational types shared by every other crate
//! in the workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - The error taxonomy ([`Error`]) with contextual information
//! - Strong domain types ([`EntityKind`], [`TagName`])
//! - Model conventions ([`ModelConfig`])
//! - CLI support types ([`cli`])

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod types;

pub mod cli;

pub use config::ModelConfig;
pub use error::{Error, Result};
pub use types::{EntityKind, TagName};
