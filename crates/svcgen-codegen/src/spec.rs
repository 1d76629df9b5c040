//! Declarative artifact specs.
//!
//! A [`Spec`] describes one artifact per service: where it goes, whether
//! to produce it at all, and which generators fill it. Generation order is
//! fixed: before-hooks, then service generators, then method generators,
//! each in registration order.
//!
//! # Examples
//!
//! ```
//! use svcgen_codegen::conditions::service_flag;
//! use svcgen_codegen::spec::{MethodGeneratorHandler, Spec};
//! use svcgen_model::declaration::ParsedInterface;
//! use svcgen_model::{ServiceModelBuilder, TagParserRegistry};
//!
//! let mut spec = Spec::new("txt", "methods.txt")
//!     .path_fn(|service| service.name.to_lowercase())
//!     .with_condition(service_flag("endpoints"));
//! spec.add_method_generator(
//!     "list",
//!     MethodGeneratorHandler::new(|artifact, _service, method| {
//!         artifact.push_line(&method.name);
//!         Ok(())
//!     }),
//! )
//! .unwrap();
//!
//! let iface: ParsedInterface = serde_json::from_str(r#"{
//!     "name": "EchoService",
//!     "docs": ["// @generate(endpoints)"],
//!     "methods": [{
//!         "name": "Echo",
//!         "params": [{"name": "ctx", "type": {"kind": "selector", "package": "context", "name": "Context"}}],
//!         "results": [{"name": "err", "type": {"kind": "ident", "name": "error"}}]
//!     }]
//! }"#).unwrap();
//! let registry = TagParserRegistry::new();
//! let service = ServiceModelBuilder::new(&registry).build(&iface).unwrap();
//!
//! let artifact = spec.generate(&service).unwrap().unwrap();
//! assert_eq!(artifact.content(), "Echo\n");
//! assert_eq!(artifact.relative_path().to_str(), Some("echoservice/methods.txt"));
//! ```

use crate::artifact::{Artifact, ArtifactCreator, ArtifactDescriptor, BufferCreator};
use std::fmt;
use svcgen_core::{Error, Result};
use svcgen_model::{Method, Service};

/// Predicate on a service.
pub type ServiceCondition = Box<dyn Fn(&Service) -> bool + Send + Sync>;

/// Predicate on a method of a service.
pub type MethodCondition = Box<dyn Fn(&Service, &Method) -> bool + Send + Sync>;

/// Narrows the methods a method generator visits.
pub type Extractor = Box<dyn for<'a> Fn(&'a Service) -> Vec<&'a Method> + Send + Sync>;

/// Hook run on a fresh artifact before any generator.
pub type BeforeHook = Box<dyn Fn(&mut Artifact, &Service) -> Result<()> + Send + Sync>;

/// Service-level generator callback.
pub type ServiceCallback = Box<dyn Fn(&mut Artifact, &Service) -> Result<()> + Send + Sync>;

/// Method-level generator callback.
pub type MethodCallback = Box<dyn Fn(&mut Artifact, &Service, &Method) -> Result<()> + Send + Sync>;

/// A value that is either fixed or computed from the service.
pub enum Resolver<T> {
    /// Same value for every service
    Const(T),
    /// Computed per service
    Func(Box<dyn Fn(&Service) -> T + Send + Sync>),
}

impl<T: Clone> Resolver<T> {
    /// Resolves the value for `service`.
    #[must_use]
    pub fn resolve(&self, service: &Service) -> T {
        match self {
            Self::Const(value) => value.clone(),
            Self::Func(f) => f(service),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(value) => f.debug_tuple("Const").field(value).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// A service-level generator and its gating conditions.
pub struct ServiceGeneratorHandler {
    callback: ServiceCallback,
    conditions: Vec<ServiceCondition>,
}

impl ServiceGeneratorHandler {
    /// Wraps a callback with no conditions.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut Artifact, &Service) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
            conditions: Vec::new(),
        }
    }

    /// Adds a condition; all conditions must hold.
    #[must_use]
    pub fn with_condition(mut self, condition: ServiceCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    fn applies(&self, service: &Service) -> bool {
        self.conditions.iter().all(|c| c(service))
    }
}

impl fmt::Debug for ServiceGeneratorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceGeneratorHandler")
            .field("conditions", &self.conditions.len())
            .finish_non_exhaustive()
    }
}

/// A method-level generator, its conditions, and an optional extractor.
pub struct MethodGeneratorHandler {
    callback: MethodCallback,
    conditions: Vec<MethodCondition>,
    extractor: Option<Extractor>,
}

impl MethodGeneratorHandler {
    /// Wraps a callback visiting every method.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut Artifact, &Service, &Method) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
            conditions: Vec::new(),
            extractor: None,
        }
    }

    /// Adds a condition; all conditions must hold for a method to be visited.
    #[must_use]
    pub fn with_condition(mut self, condition: MethodCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Restricts the visited methods to those `extractor` returns.
    #[must_use]
    pub fn with_extractor<F>(mut self, extractor: F) -> Self
    where
        F: for<'a> Fn(&'a Service) -> Vec<&'a Method> + Send + Sync + 'static,
    {
        self.extractor = Some(Box::new(extractor));
        self
    }

    /// Boxed form of [`with_extractor`](Self::with_extractor).
    #[must_use]
    pub fn with_boxed_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    fn methods<'a>(&self, service: &'a Service) -> Vec<&'a Method> {
        match &self.extractor {
            Some(extract) => extract(service),
            None => service.methods.iter().collect(),
        }
    }

    fn applies(&self, service: &Service, method: &Method) -> bool {
        self.conditions.iter().all(|c| c(service, method))
    }
}

impl fmt::Debug for MethodGeneratorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodGeneratorHandler")
            .field("conditions", &self.conditions.len())
            .field("extractor", &self.extractor.is_some())
            .finish_non_exhaustive()
    }
}

/// Declarative description of one artifact per service.
///
/// Immutable once registered; generation never mutates the spec.
pub struct Spec {
    file_type: String,
    path: Resolver<String>,
    name: Resolver<String>,
    overwrite: Resolver<bool>,
    merge: Resolver<bool>,
    conditions: Vec<ServiceCondition>,
    before: Vec<BeforeHook>,
    service_generators: Vec<(String, ServiceGeneratorHandler)>,
    method_generators: Vec<(String, MethodGeneratorHandler)>,
    creator: Box<dyn ArtifactCreator>,
}

impl Spec {
    /// Creates a spec for `name` in the output root, with no generators.
    ///
    /// Overwrite and merge default to `false`.
    #[must_use]
    pub fn new(file_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file_type: file_type.into(),
            path: Resolver::Const(String::new()),
            name: Resolver::Const(name.into()),
            overwrite: Resolver::Const(false),
            merge: Resolver::Const(false),
            conditions: Vec::new(),
            before: Vec::new(),
            service_generators: Vec::new(),
            method_generators: Vec::new(),
            creator: Box::new(BufferCreator::new()),
        }
    }

    /// File-type tag.
    #[must_use]
    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    /// Sets a constant output directory.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Resolver::Const(path.into());
        self
    }

    /// Computes the output directory per service.
    #[must_use]
    pub fn path_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Service) -> String + Send + Sync + 'static,
    {
        self.path = Resolver::Func(Box::new(f));
        self
    }

    /// Computes the file name per service.
    #[must_use]
    pub fn name_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Service) -> String + Send + Sync + 'static,
    {
        self.name = Resolver::Func(Box::new(f));
        self
    }

    /// Sets a constant overwrite policy.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = Resolver::Const(overwrite);
        self
    }

    /// Computes the overwrite policy per service.
    #[must_use]
    pub fn overwrite_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Service) -> bool + Send + Sync + 'static,
    {
        self.overwrite = Resolver::Func(Box::new(f));
        self
    }

    /// Sets a constant merge policy.
    #[must_use]
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = Resolver::Const(merge);
        self
    }

    /// Computes the merge policy per service.
    #[must_use]
    pub fn merge_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Service) -> bool + Send + Sync + 'static,
    {
        self.merge = Resolver::Func(Box::new(f));
        self
    }

    /// Adds a gating condition; the artifact is produced only if all hold.
    #[must_use]
    pub fn with_condition(mut self, condition: ServiceCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Appends a before-hook.
    #[must_use]
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Artifact, &Service) -> Result<()> + Send + Sync + 'static,
    {
        self.before.push(Box::new(hook));
        self
    }

    /// Replaces the artifact creator.
    #[must_use]
    pub fn with_creator(mut self, creator: impl ArtifactCreator + 'static) -> Self {
        self.creator = Box::new(creator);
        self
    }

    /// Registers a service-level generator under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if a service generator with the same
    /// name is already registered.
    pub fn add_service_generator(
        &mut self,
        name: impl Into<String>,
        handler: ServiceGeneratorHandler,
    ) -> Result<()> {
        let name = name.into();
        if self.service_generators.iter().any(|(n, _)| *n == name) {
            return Err(Error::ConfigError {
                message: format!("service generator '{name}' registered twice"),
            });
        }
        self.service_generators.push((name, handler));
        Ok(())
    }

    /// Registers a method-level generator under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if a method generator with the same
    /// name is already registered.
    pub fn add_method_generator(
        &mut self,
        name: impl Into<String>,
        handler: MethodGeneratorHandler,
    ) -> Result<()> {
        let name = name.into();
        if self.method_generators.iter().any(|(n, _)| *n == name) {
            return Err(Error::ConfigError {
                message: format!("method generator '{name}' registered twice"),
            });
        }
        self.method_generators.push((name, handler));
        Ok(())
    }

    /// Service generator names in registration order.
    pub fn service_generator_names(&self) -> impl Iterator<Item = &str> {
        self.service_generators.iter().map(|(n, _)| n.as_str())
    }

    /// Method generator names in registration order.
    pub fn method_generator_names(&self) -> impl Iterator<Item = &str> {
        self.method_generators.iter().map(|(n, _)| n.as_str())
    }

    /// Returns `true` if every gating condition holds for `service`.
    #[must_use]
    pub fn applies_to(&self, service: &Service) -> bool {
        self.conditions.iter().all(|c| c(service))
    }

    /// Produces this spec's artifact for `service`.
    ///
    /// Returns `Ok(None)` when a gating condition fails; that is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns the first error of the creator, a before-hook, or a
    /// generator. The partially written artifact is dropped.
    pub fn generate(&self, service: &Service) -> Result<Option<Artifact>> {
        if !self.applies_to(service) {
            tracing::debug!(spec = %self.file_type, service = %service.name, "conditions not met, skipping");
            return Ok(None);
        }

        let descriptor = ArtifactDescriptor {
            file_type: self.file_type.clone(),
            path: self.path.resolve(service),
            name: self.name.resolve(service),
            overwrite: self.overwrite.resolve(service),
            merge: self.merge.resolve(service),
        };
        let mut artifact = self.creator.create(descriptor, service)?;

        for hook in &self.before {
            hook(&mut artifact, service)?;
        }

        for (name, handler) in &self.service_generators {
            if !handler.applies(service) {
                continue;
            }
            tracing::trace!(generator = %name, service = %service.name, "running service generator");
            (handler.callback)(&mut artifact, service).inspect_err(|e| {
                tracing::debug!(generator = %name, error = %e, "service generator failed");
            })?;
        }

        for (name, handler) in &self.method_generators {
            for method in handler.methods(service) {
                if !handler.applies(service, method) {
                    continue;
                }
                tracing::trace!(generator = %name, method = %method.name, "running method generator");
                (handler.callback)(&mut artifact, service, method).inspect_err(|e| {
                    tracing::debug!(generator = %name, method = %method.name, error = %e, "method generator failed");
                })?;
            }
        }

        Ok(Some(artifact))
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spec")
            .field("file_type", &self.file_type)
            .field("path", &self.path)
            .field("name", &self.name)
            .field("conditions", &self.conditions.len())
            .field("before", &self.before.len())
            .field(
                "service_generators",
                &self.service_generator_names().collect::<Vec<_>>(),
            )
            .field(
                "method_generators",
                &self.method_generator_names().collect::<Vec<_>>(),
            )
            .field("creator", &self.creator)
            .finish_non_exhaustive()
    }
}
