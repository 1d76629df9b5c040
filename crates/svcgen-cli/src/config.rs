//! `svcgen.toml` configuration.
//!
//! The `[model]` section carries the declaration conventions; each
//! `[[artifacts]]` entry describes one template-driven artifact.
//!
//! # Examples
//!
//! ```toml
//! [model]
//! service_suffix = "Service"
//!
//! [[artifacts]]
//! name = "logging"
//! file_type = "go"
//! path = "{package}/logging"
//! file = "logging.go"
//! overwrite = true
//! when = "logging"
//! header = "// Code generated by svcgen. DO NOT EDIT."
//! service_template = "package logging\n"
//! method_template = "func (l *logging) {{method.name}}() {}\n"
//! method_flag = "logging"
//! ```
//!
//! `path` and `file` accept the placeholders `{package}`, `{service}` and
//! `{alias}`; templates are Handlebars with `{{service.*}}` and, for
//! method templates, `{{method.*}}` in scope.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use svcgen_codegen::conditions::{flag_enabled_anywhere, methods_with_flag};
use svcgen_codegen::{BufferCreator, GeneratorRegistry, Spec, TemplateEngine, TemplateGenerator};
use svcgen_core::{Error, ModelConfig};
use svcgen_model::Service;
use tracing::debug;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Declaration conventions
    #[serde(default)]
    pub model: ModelConfig,

    /// Configured artifacts, in generation order
    #[serde(default)]
    pub artifacts: Vec<ArtifactConfig>,
}

/// One template-driven artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactConfig {
    /// Unique artifact name
    pub name: String,

    /// File-type tag
    #[serde(default = "default_file_type")]
    pub file_type: String,

    /// Directory under the output root (placeholders allowed)
    #[serde(default)]
    pub path: String,

    /// File name (placeholders allowed)
    pub file: String,

    /// Replace an existing file
    #[serde(default)]
    pub overwrite: bool,

    /// Append to an existing file
    #[serde(default)]
    pub merge: bool,

    /// Generate flag that must be enabled on the service or any method
    pub when: Option<String>,

    /// First line of every generated file
    pub header: Option<String>,

    /// Rendered once per service
    pub service_template: Option<String>,

    /// Rendered once per visited method
    pub method_template: Option<String>,

    /// Restricts the method template to methods with this flag enabled
    pub method_flag: Option<String>,
}

fn default_file_type() -> String {
    "go".to_string()
}

impl Config {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the document does not parse or
    /// fails [`validate`](Self::validate).
    pub fn from_toml_str(source: &str) -> svcgen_core::Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| Error::ConfigError {
            message: format!("invalid configuration: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration at `path`, or the default configuration
    /// when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("no configuration given, using defaults");
            return Ok(Self::default());
        };
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml_str(&source)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        debug!(
            path = %path.display(),
            artifacts = config.artifacts.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Checks model conventions and every artifact entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] for invalid model conventions,
    /// duplicate artifact names, an artifact without templates, or an
    /// artifact that both overwrites and merges.
    pub fn validate(&self) -> svcgen_core::Result<()> {
        self.model.validate()?;
        for (i, artifact) in self.artifacts.iter().enumerate() {
            if self.artifacts[..i].iter().any(|a| a.name == artifact.name) {
                return Err(config_error(format!("artifact '{}' defined twice", artifact.name)));
            }
            artifact.validate()?;
        }
        Ok(())
    }

    /// Builds a generator registry with one spec per artifact.
    ///
    /// All templates share one engine; artifact `name` owns the templates
    /// `name/service` and `name/method`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if a template does not parse, or
    /// [`Error::ConfigError`] for duplicate artifact names.
    pub fn build_registry(&self) -> svcgen_core::Result<GeneratorRegistry> {
        let mut engine = TemplateEngine::new()?;
        for artifact in &self.artifacts {
            if let Some(template) = &artifact.service_template {
                engine.register_template_string(&artifact.service_template_name(), template)?;
            }
            if let Some(template) = &artifact.method_template {
                engine.register_template_string(&artifact.method_template_name(), template)?;
            }
        }
        let engine = Arc::new(engine);

        let mut registry = GeneratorRegistry::new();
        for artifact in &self.artifacts {
            registry.register(artifact.name.clone(), artifact.to_spec(&engine)?)?;
        }
        Ok(registry)
    }
}

impl ArtifactConfig {
    fn validate(&self) -> svcgen_core::Result<()> {
        if self.name.trim().is_empty() {
            return Err(config_error("artifact name cannot be empty"));
        }
        if self.file.trim().is_empty() {
            return Err(config_error(format!("artifact '{}' has no file name", self.name)));
        }
        if self.service_template.is_none() && self.method_template.is_none() {
            return Err(config_error(format!("artifact '{}' has no template", self.name)));
        }
        if self.overwrite && self.merge {
            return Err(config_error(format!(
                "artifact '{}' cannot both overwrite and merge",
                self.name
            )));
        }
        if self.method_flag.is_some() && self.method_template.is_none() {
            return Err(config_error(format!(
                "artifact '{}' sets method_flag without a method template",
                self.name
            )));
        }
        Ok(())
    }

    fn service_template_name(&self) -> String {
        format!("{}/service", self.name)
    }

    fn method_template_name(&self) -> String {
        format!("{}/method", self.name)
    }

    fn to_spec(&self, engine: &Arc<TemplateEngine<'static>>) -> svcgen_core::Result<Spec> {
        let path = self.path.clone();
        let file = self.file.clone();
        let mut spec = Spec::new(self.file_type.clone(), self.file.clone())
            .path_fn(move |service| expand_placeholders(&path, service))
            .name_fn(move |service| expand_placeholders(&file, service))
            .with_overwrite(self.overwrite)
            .with_merge(self.merge);

        if let Some(header) = &self.header {
            spec = spec.with_creator(BufferCreator::new().with_header(header.clone()));
        }
        if let Some(flag) = &self.when {
            spec = spec.with_condition(flag_enabled_anywhere(flag.clone()));
        }

        if self.service_template.is_some() {
            let generator = TemplateGenerator::new(Arc::clone(engine), self.service_template_name());
            spec.add_service_generator("service", generator.into_service_handler())?;
        }
        if self.method_template.is_some() {
            let generator = TemplateGenerator::new(Arc::clone(engine), self.method_template_name());
            let mut handler = generator.into_method_handler();
            if let Some(flag) = &self.method_flag {
                handler = handler.with_boxed_extractor(methods_with_flag(flag.clone()));
            }
            spec.add_method_generator("method", handler)?;
        }
        Ok(spec)
    }
}

/// Substitutes `{package}`, `{service}` and `{alias}` in `pattern`.
#[must_use]
pub fn expand_placeholders(pattern: &str, service: &Service) -> String {
    pattern
        .replace("{package}", &service.package)
        .replace("{service}", &service.name)
        .replace("{alias}", &service.alias)
}

fn config_error(message: impl Into<String>) -> Error {
    Error::ConfigError {
        message: message.into(),
    }
}
