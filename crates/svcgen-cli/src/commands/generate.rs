//! Generate command implementation.
//!
//! This command:
//! 1. Loads the parsed declaration and `svcgen.toml`
//! 2. Builds a service model per interface
//! 3. Runs every configured artifact for every service
//! 4. Persists artifacts under the output root (or plans it with `--dry-run`)

use super::common::load_declaration;
use crate::config::Config;
use crate::output::{WriteOutcome, persist, plan, target_path};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use svcgen_core::cli::{ExitCode, OutputFormat};
use svcgen_model::{ServiceModelBuilder, TagParserRegistry};
use tracing::{error, info, warn};

/// Result of one generate run.
#[derive(Debug, Default, Serialize)]
pub struct GenerateSummary {
    /// Services that built successfully
    pub services: Vec<String>,
    /// Artifacts produced, in generation order
    pub artifacts: Vec<ArtifactEntry>,
    /// Interfaces rejected by the model builder
    pub model_errors: Vec<ModelErrorEntry>,
    /// Artifacts that failed for a service
    pub failures: Vec<FailureEntry>,
    /// Nothing was written
    pub dry_run: bool,
}

/// One produced artifact.
#[derive(Debug, Serialize)]
pub struct ArtifactEntry {
    /// Target path
    pub path: String,
    /// What was (or would be) done
    pub outcome: WriteOutcome,
    /// Content size in bytes
    pub bytes: usize,
}

/// One interface the model builder rejected.
#[derive(Debug, Serialize)]
pub struct ModelErrorEntry {
    /// Interface name
    pub interface: String,
    /// Error message
    pub error: String,
}

/// One artifact that failed for one service.
#[derive(Debug, Serialize)]
pub struct FailureEntry {
    /// Artifact name
    pub artifact: String,
    /// Service name
    pub service: String,
    /// Error message
    pub error: String,
}

impl GenerateSummary {
    /// Exit code for this run.
    ///
    /// Model errors take precedence over artifact failures.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if !self.model_errors.is_empty() {
            ExitCode::INVALID_INPUT
        } else if !self.failures.is_empty() {
            ExitCode::PARTIAL
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Runs the pipeline and returns the summary without printing it.
///
/// A rejected interface does not stop its siblings, and a failing
/// artifact does not stop the others.
///
/// # Errors
///
/// Returns an error if the declaration or configuration cannot be loaded,
/// a configured template does not parse, an artifact path escapes `out`,
/// or an artifact cannot be written. Path checks happen before anything
/// is written.
pub fn generate(
    declaration: &Path,
    config: Option<&Path>,
    out: &Path,
    dry_run: bool,
) -> Result<GenerateSummary> {
    let file = load_declaration(declaration)?;
    let config = Config::load(config)?;
    let registry = config
        .build_registry()
        .context("failed to prepare configured artifacts")?;
    if registry.is_empty() {
        warn!("no artifacts configured, nothing to generate");
    }

    let tag_parsers = TagParserRegistry::new();
    let builder = ServiceModelBuilder::new(&tag_parsers).with_config(config.model.clone());

    let mut summary = GenerateSummary {
        dry_run,
        ..GenerateSummary::default()
    };
    let mut services = Vec::with_capacity(file.interfaces.len());
    for iface in &file.interfaces {
        match builder.build_in(&file.package, iface) {
            Ok(service) => {
                summary.services.push(service.name.clone());
                services.push(service);
            }
            Err(e) => {
                error!(interface = %iface.name, error = %e, "interface rejected");
                summary.model_errors.push(ModelErrorEntry {
                    interface: iface.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let report = registry.generate_all(&services);

    // Every target is checked before the first write.
    let targets = report
        .artifacts
        .iter()
        .map(|artifact| target_path(out, artifact))
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("refusing to write outside {}", out.display()))?;

    for (artifact, target) in report.artifacts.iter().zip(targets) {
        let outcome = if dry_run {
            plan(artifact, &target)?
        } else {
            persist(&target, artifact)?
        };
        summary.artifacts.push(ArtifactEntry {
            path: target.display().to_string(),
            outcome,
            bytes: artifact.content().len(),
        });
    }

    summary.failures = report
        .failures
        .into_iter()
        .map(|f| FailureEntry {
            artifact: f.spec,
            service: f.service,
            error: f.error.to_string(),
        })
        .collect();

    info!(
        services = summary.services.len(),
        artifacts = summary.artifacts.len(),
        model_errors = summary.model_errors.len(),
        failures = summary.failures.len(),
        dry_run,
        "generate finished"
    );
    Ok(summary)
}

/// Runs the generate command.
///
/// Prints the summary in the requested format. Exits with
/// [`ExitCode::INVALID_INPUT`] when an interface was rejected and with
/// [`ExitCode::PARTIAL`] when an artifact failed; everything else that
/// could be produced is still written.
///
/// # Errors
///
/// Returns an error if loading inputs or writing artifacts fails.
pub fn run(
    declaration: &Path,
    config: Option<&Path>,
    out: &Path,
    dry_run: bool,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let summary = generate(declaration, config, out, dry_run)?;
    let formatted = crate::formatters::format_output(&summary, output_format)?;
    println!("{formatted}");
    Ok(summary.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_precedence() {
        let mut summary = GenerateSummary::default();
        assert_eq!(summary.exit_code(), ExitCode::SUCCESS);

        summary.failures.push(FailureEntry {
            artifact: "logging".to_string(),
            service: "UserService".to_string(),
            error: "boom".to_string(),
        });
        assert_eq!(summary.exit_code(), ExitCode::PARTIAL);

        summary.model_errors.push(ModelErrorEntry {
            interface: "Broken".to_string(),
            error: "bad".to_string(),
        });
        assert_eq!(summary.exit_code(), ExitCode::INVALID_INPUT);
    }

    #[test]
    fn test_summary_serialization() {
        let summary = GenerateSummary {
            services: vec!["UserService".to_string()],
            artifacts: vec![ArtifactEntry {
                path: "gen/users.go".to_string(),
                outcome: WriteOutcome::Created,
                bytes: 12,
            }],
            dry_run: true,
            ..GenerateSummary::default()
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["artifacts"][0]["outcome"], "created");
        assert_eq!(json["dry_run"], true);
    }

    #[test]
    fn test_missing_declaration_is_error() {
        let result = generate(Path::new("/nonexistent/decl.json"), None, Path::new("."), true);
        assert!(result.is_err());
    }
}
