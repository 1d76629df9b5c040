//! Generator registry.
//!
//! Holds named [`Spec`]s in registration order and runs all of them for a
//! service. A failing spec never stops its siblings: the report carries
//! every produced artifact alongside every failure.

use crate::artifact::Artifact;
use crate::spec::Spec;
use svcgen_core::{Error, Result};
use svcgen_model::Service;

/// One spec that failed for one service.
#[derive(Debug)]
pub struct GenerationFailure {
    /// Name the spec was registered under
    pub spec: String,
    /// Service being generated
    pub service: String,
    /// What went wrong
    pub error: Error,
}

/// Outcome of running the registry.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Produced artifacts, in service then spec registration order
    pub artifacts: Vec<Artifact>,
    /// Failed specs, in the same order
    pub failures: Vec<GenerationFailure>,
}

impl GenerationReport {
    /// Returns `true` if no spec failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Appends another report.
    pub fn extend(&mut self, other: Self) {
        self.artifacts.extend(other.artifacts);
        self.failures.extend(other.failures);
    }
}

/// Ordered collection of named specs.
#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    specs: Vec<(String, Spec)>,
}

impl GeneratorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `spec` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if `name` is already registered.
    pub fn register(&mut self, name: impl Into<String>, spec: Spec) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(Error::ConfigError {
                message: format!("spec '{name}' registered twice"),
            });
        }
        tracing::debug!(spec = %name, file_type = %spec.file_type(), "registered spec");
        self.specs.push((name, spec));
        Ok(())
    }

    /// Returns `true` if a spec is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.specs.iter().any(|(n, _)| n == name)
    }

    /// Spec names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|(n, _)| n.as_str())
    }

    /// Number of registered specs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` if no spec is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Runs every spec for `service`, in registration order.
    ///
    /// Specs whose conditions fail contribute nothing. A spec error is
    /// recorded and the remaining specs still run.
    #[must_use]
    pub fn generate(&self, service: &Service) -> GenerationReport {
        let mut report = GenerationReport::default();
        for (name, spec) in &self.specs {
            match spec.generate(service) {
                Ok(Some(artifact)) => {
                    tracing::debug!(
                        spec = %name,
                        service = %service.name,
                        path = %artifact.relative_path().display(),
                        "generated artifact"
                    );
                    report.artifacts.push(artifact);
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(spec = %name, service = %service.name, error = %error, "spec failed");
                    report.failures.push(GenerationFailure {
                        spec: name.clone(),
                        service: service.name.clone(),
                        error,
                    });
                }
            }
        }
        report
    }

    /// Runs every spec for every service.
    #[must_use]
    pub fn generate_all(&self, services: &[Service]) -> GenerationReport {
        let mut report = GenerationReport::default();
        for service in services {
            report.extend(self.generate(service));
        }
        tracing::info!(
            services = services.len(),
            artifacts = report.artifacts.len(),
            failures = report.failures.len(),
            "generation finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::flag_enabled_anywhere;
    use crate::spec::{MethodGeneratorHandler, ServiceGeneratorHandler};
    use svcgen_model::declaration::ParsedInterface;
    use svcgen_model::{ServiceModelBuilder, TagParserRegistry};

    fn service(docs: &str, method_docs: &str) -> Service {
        let json = format!(
            r#"{{
                "name": "CartService",
                "docs": ["{docs}"],
                "methods": [{{
                    "name": "Add",
                    "docs": ["{method_docs}"],
                    "params": [{{"name": "ctx", "type": {{"kind": "selector", "package": "context", "name": "Context"}}}}],
                    "results": [{{"name": "err", "type": {{"kind": "ident", "name": "error"}}}}]
                }}]
            }}"#
        );
        let iface: ParsedInterface = serde_json::from_str(&json).unwrap();
        let registry = TagParserRegistry::new();
        ServiceModelBuilder::new(&registry).build(&iface).unwrap()
    }

    fn named_spec(name: &str) -> Spec {
        let mut spec = Spec::new("txt", format!("{name}.txt"));
        let label = name.to_string();
        spec.add_service_generator(
            "body",
            ServiceGeneratorHandler::new(move |a, s| {
                a.push_line(&format!("{label} for {}", s.name));
                Ok(())
            }),
        )
        .unwrap();
        spec
    }

    #[test]
    fn test_duplicate_spec_name_rejected() {
        let mut registry = GeneratorRegistry::new();
        registry.register("a", named_spec("a")).unwrap();
        let err = registry.register("a", named_spec("a")).unwrap_err();
        assert!(err.is_config_error());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_gated_spec_absent_from_result() {
        let mut registry = GeneratorRegistry::new();
        registry
            .register(
                "logging",
                named_spec("logging").with_condition(flag_enabled_anywhere("logging")),
            )
            .unwrap();
        registry.register("always", named_spec("always")).unwrap();

        let report = registry.generate(&service("// @generate(tracing)", "// @disable(logging)"));
        assert!(report.is_success());
        assert_eq!(report.artifacts.len(), 1);
        assert_eq!(report.artifacts[0].descriptor.name, "always.txt");

        let report = registry.generate(&service("// @generate(tracing)", "// @enable(logging)"));
        assert_eq!(report.artifacts.len(), 2);
        assert_eq!(report.artifacts[0].descriptor.name, "logging.txt");
    }

    #[test]
    fn test_failure_isolated_to_spec() {
        let mut broken = Spec::new("txt", "broken.txt");
        broken
            .add_method_generator(
                "explode",
                MethodGeneratorHandler::new(|_, _, _| {
                    Err(svcgen_core::Error::generator("explode", "bad method"))
                }),
            )
            .unwrap();

        let mut registry = GeneratorRegistry::new();
        registry.register("first", named_spec("first")).unwrap();
        registry.register("broken", broken).unwrap();
        registry.register("last", named_spec("last")).unwrap();

        let report = registry.generate(&service("", ""));
        assert!(!report.is_success());
        assert_eq!(
            report
                .artifacts
                .iter()
                .map(|a| a.descriptor.name.as_str())
                .collect::<Vec<_>>(),
            vec!["first.txt", "last.txt"]
        );
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].spec, "broken");
        assert_eq!(report.failures[0].service, "CartService");
        assert!(report.failures[0].error.is_generator_error());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut registry = GeneratorRegistry::new();
        for name in ["c", "a", "b"] {
            registry.register(name, named_spec(name)).unwrap();
        }
        let service = service("// @generate(middleware)", "");

        let first = registry.generate(&service);
        let second = registry.generate(&service);
        assert_eq!(first.artifacts, second.artifacts);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(first.artifacts[0].content(), "c for CartService\n");
    }

    #[test]
    fn test_generate_all_orders_by_service() {
        let mut registry = GeneratorRegistry::new();
        registry.register("one", named_spec("one")).unwrap();
        registry.register("two", named_spec("two")).unwrap();

        let services = vec![service("", ""), service("// @generate(logging)", "")];
        let report = registry.generate_all(&services);
        assert_eq!(report.artifacts.len(), 4);
        assert_eq!(report.artifacts[1].descriptor.name, "two.txt");
        assert_eq!(report.artifacts[2].descriptor.name, "one.txt");
    }

    #[test]
    fn test_empty_registry() {
        let registry = GeneratorRegistry::new();
        assert!(registry.is_empty());
        let report = registry.generate(&service("", ""));
        assert!(report.artifacts.is_empty());
        assert!(report.is_success());
    }
}
