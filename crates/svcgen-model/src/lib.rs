//! Service model for svcgen.
//!
//! Builds read-only service graphs from parsed interface declarations.
//! Tags in documentation comments configure the graph: which artifacts to
//! generate, aliases, HTTP routing, and log redaction.
//!
//! # Architecture
//!
//! 1. [`declaration`] - Input shape handed over by the source parser
//! 2. [`builder`] - Validation, type conversion, and tag application
//! 3. [`builtin`] - Built-in tag names and payload parsing
//! 4. [`registry`] - Custom tag parsers supplied by extensions
//! 5. [`model`] - The resolved [`Service`] / [`Method`] graph
//!
//! # Examples
//!
//! ```
//! use svcgen_model::declaration::ParsedFile;
//! use svcgen_model::{ServiceModelBuilder, TagParserRegistry};
//!
//! let file: ParsedFile = serde_json::from_str(r#"{
//!     "package": "accounts",
//!     "interfaces": [{
//!         "name": "AccountService",
//!         "docs": ["// Account management. @generate(middleware)"],
//!         "methods": []
//!     }]
//! }"#).unwrap();
//!
//! let registry = TagParserRegistry::new();
//! let services = ServiceModelBuilder::new(&registry).parse_file(&file).unwrap();
//!
//! assert_eq!(services[0].docs, vec!["Account management."]);
//! assert!(services[0].is_enabled("tracing"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod builtin;
pub mod declaration;
pub mod model;
pub mod registry;

pub use builder::ServiceModelBuilder;
pub use declaration::{ParsedField, ParsedFile, ParsedInterface, ParsedMethod, TypeExpr};
pub use model::{Argument, Capabilities, Capability, Field, HttpOrigin, Method, Service, Type};
pub use registry::{MethodTagParser, ParamTagParser, ServiceTagParser, TagParserRegistry};
