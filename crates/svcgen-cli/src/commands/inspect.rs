//! Inspect command implementation.
//!
//! Builds the service model and prints it, so tag effects can be checked
//! without generating anything.

use super::common::load_declaration;
use crate::config::Config;
use anyhow::{Context, Result};
use std::path::Path;
use svcgen_core::cli::{ExitCode, OutputFormat};
use svcgen_model::{Service, ServiceModelBuilder, TagParserRegistry};
use tracing::info;

/// Builds every interface of the declaration.
///
/// # Errors
///
/// Returns an error if the inputs cannot be loaded or any interface is
/// rejected.
pub fn inspect(declaration: &Path, config: Option<&Path>) -> Result<Vec<Service>> {
    let file = load_declaration(declaration)?;
    let config = Config::load(config)?;
    let tag_parsers = TagParserRegistry::new();
    let services = ServiceModelBuilder::new(&tag_parsers)
        .with_config(config.model)
        .parse_file(&file)
        .with_context(|| format!("failed to build service model from {}", declaration.display()))?;
    info!(services = services.len(), "resolved service model");
    Ok(services)
}

/// Runs the inspect command.
///
/// # Errors
///
/// Returns an error if the model cannot be built or formatted.
pub fn run(declaration: &Path, config: Option<&Path>, output_format: OutputFormat) -> Result<ExitCode> {
    let services = inspect(declaration, config)?;
    let formatted = crate::formatters::format_output(&services, output_format)?;
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}
