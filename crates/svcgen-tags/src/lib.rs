//! Annotation DSL for svcgen.
//!
//! Extracts directives from free-form documentation comments and evaluates
//! the generate-flag algebra.
//!
//! # Architecture
//!
//! 1. [`doc`] - Splits comment text into prose and `@tag` tokens
//! 2. [`splitter`] - Bracket-aware tokenizer used for comments and payloads
//! 3. [`dispatch`] - Resolves a tag token to a parser pool by longest prefix
//! 4. [`flags`] - Flag sets, universes, groups, and directives
//! 5. [`options`] - Option bags filled by custom tag parsers
//!
//! # Examples
//!
//! ```
//! use svcgen_tags::dispatch::resolve;
//! use svcgen_tags::doc::classify;
//! use svcgen_tags::flags::{GenerateFlagsHandler, GenerateSet};
//! use svcgen_tags::splitter::split;
//!
//! let doc = classify(&["// Accounts API. @generate(middleware, http)"]);
//! let tag = resolve(&doc.tags[0], &["generate", "generate-all"], &[] as &[&str]).unwrap();
//!
//! let handler = GenerateFlagsHandler::service_defaults();
//! let mut set = GenerateSet::new();
//! let names = split(tag.payload.as_deref().unwrap_or_default(), ",");
//! handler.only(&mut set, &names).unwrap();
//!
//! assert!(set.contains("logging"));
//! assert!(set.contains("http-server"));
//! assert_eq!(doc.docs, vec!["Accounts", "API."]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod dispatch;
pub mod doc;
pub mod flags;
pub mod options;
pub mod splitter;

pub use dispatch::{ResolveError, ResolvedTag, TagPool, resolve};
pub use doc::{DOC_WIDTH, DocComment, ESCAPE_MARKER, classify};
pub use flags::{GenerateFlagsHandler, GenerateSet, UnknownFlag};
pub use options::{TagOptions, TagsOptions};
pub use splitter::{Unbalanced, check_balanced, split};
