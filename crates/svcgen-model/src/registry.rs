//! Custom tag parser registry.
//!
//! Extensions register parsers per entity kind on an explicit
//! [`TagParserRegistry`] value, which the model builder borrows. A custom
//! parser sees a read-only snapshot of the entity and fills an option bag;
//! it never mutates the entity itself.
//!
//! # Examples
//!
//! ```
//! use svcgen_model::TagParserRegistry;
//!
//! let mut registry = TagParserRegistry::new();
//! registry
//!     .register_method_tag_parser("cache", |_method, payload, options| {
//!         options.set("ttl", payload.unwrap_or("60s"));
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! // Built-in names are reserved
//! assert!(registry.register_method_tag_parser("enable", |_, _, _| Ok(())).is_err());
//! ```

use crate::builtin::{METHOD_TAGS, PARAM_TAGS, SERVICE_TAGS};
use crate::model::{Argument, Method, Service};
use std::fmt;
use svcgen_core::{EntityKind, Error, Result, TagName};
use svcgen_tags::TagOptions;

/// Custom service tag parser.
pub type ServiceTagParser =
    Box<dyn Fn(&Service, Option<&str>, &mut TagOptions) -> Result<()> + Send + Sync>;

/// Custom method tag parser.
pub type MethodTagParser =
    Box<dyn Fn(&Method, Option<&str>, &mut TagOptions) -> Result<()> + Send + Sync>;

/// Custom parameter tag parser.
pub type ParamTagParser =
    Box<dyn Fn(&Argument, Option<&str>, &mut TagOptions) -> Result<()> + Send + Sync>;

/// Custom tag parsers, one ordered table per entity kind.
#[derive(Default)]
pub struct TagParserRegistry {
    service: Vec<(TagName, ServiceTagParser)>,
    method: Vec<(TagName, MethodTagParser)>,
    param: Vec<(TagName, ParamTagParser)>,
}

impl TagParserRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parser for `@name` on services.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagRegistration`] if `name` has characters outside
    /// `[A-Za-z0-9-_]`, or collides with a built-in or already registered
    /// service tag.
    pub fn register_service_tag_parser<F>(&mut self, name: &str, parser: F) -> Result<()>
    where
        F: Fn(&Service, Option<&str>, &mut TagOptions) -> Result<()> + Send + Sync + 'static,
    {
        let name = check_name(EntityKind::Service, name, SERVICE_TAGS, &self.service)?;
        tracing::debug!(tag = %name, "registered custom service tag");
        self.service.push((name, Box::new(parser)));
        Ok(())
    }

    /// Registers a parser for `@name` on methods.
    ///
    /// # Errors
    ///
    /// Same rules as [`register_service_tag_parser`](Self::register_service_tag_parser),
    /// against the method tables.
    pub fn register_method_tag_parser<F>(&mut self, name: &str, parser: F) -> Result<()>
    where
        F: Fn(&Method, Option<&str>, &mut TagOptions) -> Result<()> + Send + Sync + 'static,
    {
        let name = check_name(EntityKind::Method, name, METHOD_TAGS, &self.method)?;
        tracing::debug!(tag = %name, "registered custom method tag");
        self.method.push((name, Box::new(parser)));
        Ok(())
    }

    /// Registers a parser for `@name` on parameters.
    ///
    /// # Errors
    ///
    /// Same rules as [`register_service_tag_parser`](Self::register_service_tag_parser),
    /// against the parameter tables.
    pub fn register_param_tag_parser<F>(&mut self, name: &str, parser: F) -> Result<()>
    where
        F: Fn(&Argument, Option<&str>, &mut TagOptions) -> Result<()> + Send + Sync + 'static,
    {
        let name = check_name(EntityKind::Param, name, PARAM_TAGS, &self.param)?;
        tracing::debug!(tag = %name, "registered custom param tag");
        self.param.push((name, Box::new(parser)));
        Ok(())
    }

    /// Custom tag names registered for `kind`, in registration order.
    #[must_use]
    pub fn names(&self, kind: EntityKind) -> Vec<&str> {
        match kind {
            EntityKind::Service => self.service.iter().map(|(n, _)| n.as_str()).collect(),
            EntityKind::Method => self.method.iter().map(|(n, _)| n.as_str()).collect(),
            EntityKind::Param => self.param.iter().map(|(n, _)| n.as_str()).collect(),
        }
    }

    /// Returns `true` if no custom parser is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.service.is_empty() && self.method.is_empty() && self.param.is_empty()
    }

    pub(crate) fn service_parser(&self, name: &str) -> Option<&ServiceTagParser> {
        lookup(&self.service, name)
    }

    pub(crate) fn method_parser(&self, name: &str) -> Option<&MethodTagParser> {
        lookup(&self.method, name)
    }

    pub(crate) fn param_parser(&self, name: &str) -> Option<&ParamTagParser> {
        lookup(&self.param, name)
    }
}

impl fmt::Debug for TagParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagParserRegistry")
            .field("service", &self.names(EntityKind::Service))
            .field("method", &self.names(EntityKind::Method))
            .field("param", &self.names(EntityKind::Param))
            .finish()
    }
}

fn lookup<'a, P>(table: &'a [(TagName, P)], name: &str) -> Option<&'a P> {
    table
        .iter()
        .find(|(n, _)| n.as_str() == name)
        .map(|(_, parser)| parser)
}

fn check_name<P>(
    kind: EntityKind,
    name: &str,
    builtin: &[&str],
    registered: &[(TagName, P)],
) -> Result<TagName> {
    let tag = TagName::new(name)?;
    if builtin.contains(&tag.as_str()) {
        return Err(Error::TagRegistration {
            name: name.to_string(),
            reason: format!("'{tag}' is a built-in {kind} tag"),
        });
    }
    if registered.iter().any(|(n, _)| *n == tag) {
        return Err(Error::TagRegistration {
            name: name.to_string(),
            reason: format!("'{tag}' is already registered for {kind}s"),
        });
    }
    Ok(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_list_in_order() {
        let mut registry = TagParserRegistry::new();
        registry
            .register_service_tag_parser("owner", |_, _, _| Ok(()))
            .unwrap();
        registry
            .register_service_tag_parser("Team_Name", |_, _, _| Ok(()))
            .unwrap();

        assert_eq!(registry.names(EntityKind::Service), vec!["owner", "team_name"]);
        assert!(registry.names(EntityKind::Method).is_empty());
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_builtin_collision_rejected() {
        let mut registry = TagParserRegistry::new();
        let err = registry
            .register_service_tag_parser("GENERATE", |_, _, _| Ok(()))
            .unwrap_err();
        assert!(err.is_registration_error());

        let err = registry
            .register_param_tag_parser("http-origin", |_, _, _| Ok(()))
            .unwrap_err();
        assert!(err.is_registration_error());
    }

    #[test]
    fn test_builtin_of_other_kind_allowed() {
        let mut registry = TagParserRegistry::new();
        // `http-prefix` is a service built-in, not a method one
        assert!(
            registry
                .register_method_tag_parser("http-prefix", |_, _, _| Ok(()))
                .is_ok()
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = TagParserRegistry::new();
        registry
            .register_param_tag_parser("mask", |_, _, _| Ok(()))
            .unwrap();
        let err = registry
            .register_param_tag_parser("Mask", |_, _, _| Ok(()))
            .unwrap_err();
        assert!(err.is_registration_error());
        assert_eq!(registry.names(EntityKind::Param).len(), 1);
    }

    #[test]
    fn test_invalid_characters_rejected() {
        let mut registry = TagParserRegistry::new();
        for bad in ["", "with space", "dot.ted", "paren(", "@at"] {
            assert!(
                registry
                    .register_method_tag_parser(bad, |_, _, _| Ok(()))
                    .is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_lookup_by_lowercase_name() {
        let mut registry = TagParserRegistry::new();
        registry
            .register_method_tag_parser("Cache", |_, _, _| Ok(()))
            .unwrap();
        assert!(registry.method_parser("cache").is_some());
        assert!(registry.method_parser("other").is_none());
        assert!(registry.service_parser("cache").is_none());
        assert!(registry.param_parser("cache").is_none());
    }

    #[test]
    fn test_debug_lists_names() {
        let mut registry = TagParserRegistry::new();
        registry
            .register_service_tag_parser("owner", |_, _, _| Ok(()))
            .unwrap();
        let debug = format!("{registry:?}");
        assert!(debug.contains("owner"));
    }
}
