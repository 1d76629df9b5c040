//! Artifact generation for svcgen.
//!
//! Turns resolved service graphs into artifacts. Each [`Spec`] describes
//! one artifact per service and the generators that fill it; the
//! [`GeneratorRegistry`] runs every spec for every service and reports
//! produced artifacts and per-spec failures side by side.
//!
//! Generators are plain closures. [`TemplateGenerator`] adapts a Handlebars
//! template into one.
//!
//! # Examples
//!
//! ```
//! use svcgen_codegen::conditions::flag_enabled_anywhere;
//! use svcgen_codegen::{GeneratorRegistry, ServiceGeneratorHandler, Spec};
//! use svcgen_model::declaration::ParsedInterface;
//! use svcgen_model::{ServiceModelBuilder, TagParserRegistry};
//!
//! let mut logging = Spec::new("go", "logging.go")
//!     .with_condition(flag_enabled_anywhere("logging"));
//! logging
//!     .add_service_generator(
//!         "header",
//!         ServiceGeneratorHandler::new(|artifact, service| {
//!             artifact.push_line(&format!("// logging for {}", service.name));
//!             Ok(())
//!         }),
//!     )
//!     .unwrap();
//!
//! let mut registry = GeneratorRegistry::new();
//! registry.register("logging", logging).unwrap();
//!
//! let iface: ParsedInterface = serde_json::from_str(
//!     r#"{"name": "PingService", "docs": ["// @generate(logging)"]}"#,
//! ).unwrap();
//! let tags = TagParserRegistry::new();
//! let service = ServiceModelBuilder::new(&tags).build(&iface).unwrap();
//!
//! let report = registry.generate(&service);
//! assert!(report.is_success());
//! assert_eq!(report.artifacts[0].content(), "// logging for PingService\n");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod artifact;
pub mod conditions;
pub mod registry;
pub mod spec;
pub mod template;
pub mod template_engine;

pub use artifact::{Artifact, ArtifactCreator, ArtifactDescriptor, BufferCreator};
pub use registry::{GenerationFailure, GenerationReport, GeneratorRegistry};
pub use spec::{MethodGeneratorHandler, Resolver, ServiceGeneratorHandler, Spec};
pub use template::{FieldContext, MethodContext, ServiceContext, TemplateGenerator};
pub use template_engine::TemplateEngine;
