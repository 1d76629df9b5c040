//! Generate-flag sets and the directive algebra over them.
//!
//! A [`GenerateSet`] holds the feature flags enabled for one entity. A
//! [`GenerateFlagsHandler`] owns the flag universe for one entity kind,
//! plus named groups that expand to leaf flags, and implements the
//! ALL / ALL-BUT / ADD / REMOVE / ONLY directives.
//!
//! # Examples
//!
//! ```
//! use svcgen_tags::flags::{GenerateFlagsHandler, GenerateSet};
//!
//! let handler = GenerateFlagsHandler::service_defaults();
//! let mut set = GenerateSet::new();
//!
//! handler.only(&mut set, &["http", "logging"]).unwrap();
//! assert!(set.contains("http-server"));
//! assert!(set.contains("logging"));
//! assert!(!set.contains("caching"));
//!
//! handler.remove(&mut set, &["http-client"]).unwrap();
//! assert!(!set.contains("http-client"));
//! ```

use serde::Serialize;
use std::collections::BTreeSet;
use svcgen_core::{EntityKind, Error, Result};

/// Flag names understood by the default universes.
pub mod names {
    /// Request/response logging middleware
    pub const LOGGING: &str = "logging";
    /// Error-only logging middleware
    pub const ERROR_LOGGING: &str = "error-logging";
    /// Panic recovery middleware
    pub const RECOVERING: &str = "recovering";
    /// Response caching middleware
    pub const CACHING: &str = "caching";
    /// Distributed tracing middleware
    pub const TRACING: &str = "tracing";
    /// Metrics middleware
    pub const METRICS: &str = "metrics";
    /// Request validation middleware
    pub const VALIDATING: &str = "validating";
    /// HTTP server transport
    pub const HTTP_SERVER: &str = "http-server";
    /// HTTP client transport
    pub const HTTP_CLIENT: &str = "http-client";
    /// HTTP request/response converters
    pub const HTTP_CONVERTER: &str = "http-converter";
    /// gRPC server transport
    pub const GRPC_SERVER: &str = "grpc-server";
    /// gRPC client transport
    pub const GRPC_CLIENT: &str = "grpc-client";
    /// gRPC protobuf converters
    pub const GRPC_CONVERTER: &str = "grpc-converter";
    /// Transport-independent endpoints
    pub const ENDPOINTS: &str = "endpoints";
    /// Request/response exchange types
    pub const EXCHANGES: &str = "exchanges";
    /// Service entry point
    pub const MAIN: &str = "main";

    /// Group: every middleware flag
    pub const MIDDLEWARE: &str = "middleware";
    /// Group: every HTTP flag
    pub const HTTP: &str = "http";
    /// Group: every gRPC flag
    pub const GRPC: &str = "grpc";
    /// Group: transport-independent building blocks
    pub const TRANSPORT: &str = "transport";
}

/// Set of enabled feature flags for one entity.
///
/// Iteration is sorted by flag name so generated output never depends on
/// insertion history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GenerateSet(BTreeSet<String>);

impl GenerateSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `flag` is enabled.
    #[must_use]
    pub fn contains(&self, flag: &str) -> bool {
        self.0.contains(flag)
    }

    /// Enables `flag`.
    pub fn enable(&mut self, flag: impl Into<String>) {
        self.0.insert(flag.into());
    }

    /// Disables `flag`.
    pub fn disable(&mut self, flag: &str) {
        self.0.remove(flag);
    }

    /// Sets `flag` to `enabled`.
    pub fn set(&mut self, flag: &str, enabled: bool) {
        if enabled {
            self.enable(flag);
        } else {
            self.disable(flag);
        }
    }

    /// Disables every flag.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns the number of enabled flags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no flag is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates enabled flags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for GenerateSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A directive referenced a name outside the allowed universe.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("'{value}' is not a {kind} flag or group")]
pub struct UnknownFlag {
    /// Entity kind whose universe was consulted
    pub kind: EntityKind,
    /// First offending name
    pub value: String,
}

impl UnknownFlag {
    /// Converts into [`Error::InvalidFlagValue`] with entity context.
    #[must_use]
    pub fn into_error(self, entity: &str, directive: &str) -> Error {
        Error::InvalidFlagValue {
            kind: self.kind,
            entity: entity.to_string(),
            directive: directive.to_string(),
            value: self.value,
        }
    }
}

/// Flag universe and group definitions for one entity kind.
///
/// Every directive first expands group names, then validates every
/// resulting leaf against the universe. Validation happens before any
/// mutation, so a failing directive leaves the target untouched.
#[derive(Debug, Clone)]
pub struct GenerateFlagsHandler {
    kind: EntityKind,
    allowed: GenerateSet,
    groups: Vec<(String, Vec<String>)>,
}

impl GenerateFlagsHandler {
    /// Creates a handler from a flag universe and group definitions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if a group shares its name with a
    /// flag, is defined twice, or lists a member that is not a declared
    /// leaf flag (groups never nest).
    ///
    /// # Examples
    ///
    /// ```
    /// use svcgen_core::EntityKind;
    /// use svcgen_tags::flags::GenerateFlagsHandler;
    ///
    /// let handler = GenerateFlagsHandler::new(
    ///     EntityKind::Method,
    ///     ["a", "b", "c"],
    ///     [("ab", vec!["a", "b"])],
    /// )
    /// .unwrap();
    /// assert_eq!(handler.group("ab").unwrap().len(), 2);
    ///
    /// let nested = GenerateFlagsHandler::new(
    ///     EntityKind::Method,
    ///     ["a"],
    ///     [("g1", vec!["a"]), ("g2", vec!["g1"])],
    /// );
    /// assert!(nested.is_err());
    /// ```
    pub fn new<F, G, N, M>(kind: EntityKind, flags: F, groups: G) -> Result<Self>
    where
        F: IntoIterator,
        F::Item: Into<String>,
        G: IntoIterator<Item = (N, Vec<M>)>,
        N: Into<String>,
        M: Into<String>,
    {
        let allowed: GenerateSet = flags.into_iter().collect();
        let mut handler = Self {
            kind,
            allowed,
            groups: Vec::new(),
        };
        for (name, members) in groups {
            let name: String = name.into();
            let members: Vec<String> = members.into_iter().map(Into::into).collect();
            handler.check_group(&name, &members)?;
            handler.groups.push((name, members));
        }
        Ok(handler)
    }

    fn check_group(&self, name: &str, members: &[String]) -> Result<()> {
        if self.allowed.contains(name) {
            return Err(Error::ConfigError {
                message: format!("{} group '{name}' shadows a flag", self.kind),
            });
        }
        if self.group(name).is_some() {
            return Err(Error::ConfigError {
                message: format!("{} group '{name}' defined twice", self.kind),
            });
        }
        if let Some(member) = members.iter().find(|m| !self.allowed.contains(m)) {
            return Err(Error::ConfigError {
                message: format!(
                    "{} group '{name}' lists '{member}', which is not a {} flag",
                    self.kind, self.kind
                ),
            });
        }
        Ok(())
    }

    /// Default universe for services.
    #[must_use]
    pub fn service_defaults() -> Self {
        Self {
            kind: EntityKind::Service,
            allowed: leaf_flags(true).collect(),
            groups: default_groups(),
        }
    }

    /// Default universe for methods: the service universe minus `main`.
    #[must_use]
    pub fn method_defaults() -> Self {
        Self {
            kind: EntityKind::Method,
            allowed: leaf_flags(false).collect(),
            groups: default_groups(),
        }
    }

    /// Entity kind this universe belongs to.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Every allowed leaf flag.
    #[must_use]
    pub const fn allowed(&self) -> &GenerateSet {
        &self.allowed
    }

    /// Members of group `name`, if defined.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(group, _)| group == name)
            .map(|(_, members)| members.as_slice())
    }

    /// Group names in definition order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// Expands groups and validates every resulting leaf flag.
    ///
    /// Names are trimmed and matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFlag`] naming the first value that is neither a
    /// group nor an allowed flag.
    pub fn expand<S: AsRef<str>>(&self, names: &[S]) -> std::result::Result<Vec<String>, UnknownFlag> {
        let mut leaves = Vec::new();
        for name in names {
            let name = name.as_ref().trim().to_ascii_lowercase();
            if let Some(members) = self.group(&name) {
                leaves.extend(members.iter().cloned());
            } else if self.allowed.contains(&name) {
                leaves.push(name);
            } else {
                return Err(UnknownFlag {
                    kind: self.kind,
                    value: name,
                });
            }
        }
        Ok(leaves)
    }

    /// ALL: copies every allowed flag already enabled in `reference`.
    ///
    /// Flags of `reference` outside this universe are ignored, which is
    /// how a method inherits only the service flags meaningful to methods.
    pub fn all(&self, target: &mut GenerateSet, reference: &GenerateSet) {
        for flag in reference.iter().filter(|f| self.allowed.contains(f)) {
            target.enable(flag);
        }
    }

    /// ALL-BUT: sets every allowed flag to `enabled`, then sets the
    /// expanded `names` to `!enabled`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFlag`] without touching `target` if any name is
    /// unknown.
    pub fn all_but<S: AsRef<str>>(
        &self,
        target: &mut GenerateSet,
        enabled: bool,
        names: &[S],
    ) -> std::result::Result<(), UnknownFlag> {
        let leaves = self.expand(names)?;
        for flag in self.allowed.iter() {
            target.set(flag, enabled);
        }
        for flag in &leaves {
            target.set(flag, !enabled);
        }
        Ok(())
    }

    /// ADD: enables the expanded `names` only.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFlag`] without touching `target` if any name is
    /// unknown.
    pub fn add<S: AsRef<str>>(
        &self,
        target: &mut GenerateSet,
        names: &[S],
    ) -> std::result::Result<(), UnknownFlag> {
        for flag in self.expand(names)? {
            target.enable(flag);
        }
        Ok(())
    }

    /// REMOVE: disables the expanded `names` only.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFlag`] without touching `target` if any name is
    /// unknown.
    pub fn remove<S: AsRef<str>>(
        &self,
        target: &mut GenerateSet,
        names: &[S],
    ) -> std::result::Result<(), UnknownFlag> {
        for flag in self.expand(names)? {
            target.disable(&flag);
        }
        Ok(())
    }

    /// ONLY: clears `target`, then enables exactly the expanded `names`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFlag`] without touching `target` if any name is
    /// unknown.
    pub fn only<S: AsRef<str>>(
        &self,
        target: &mut GenerateSet,
        names: &[S],
    ) -> std::result::Result<(), UnknownFlag> {
        let leaves = self.expand(names)?;
        target.clear();
        for flag in leaves {
            target.enable(flag);
        }
        Ok(())
    }
}

fn leaf_flags(with_main: bool) -> impl Iterator<Item = &'static str> {
    use names::{
        CACHING, ENDPOINTS, ERROR_LOGGING, EXCHANGES, GRPC_CLIENT, GRPC_CONVERTER, GRPC_SERVER,
        HTTP_CLIENT, HTTP_CONVERTER, HTTP_SERVER, LOGGING, MAIN, METRICS, RECOVERING, TRACING,
        VALIDATING,
    };
    [
        LOGGING,
        ERROR_LOGGING,
        RECOVERING,
        CACHING,
        TRACING,
        METRICS,
        VALIDATING,
        HTTP_SERVER,
        HTTP_CLIENT,
        HTTP_CONVERTER,
        GRPC_SERVER,
        GRPC_CLIENT,
        GRPC_CONVERTER,
        ENDPOINTS,
        EXCHANGES,
        MAIN,
    ]
    .into_iter()
    .filter(move |flag| with_main || *flag != MAIN)
}

fn default_groups() -> Vec<(String, Vec<String>)> {
    use names::{
        CACHING, ENDPOINTS, ERROR_LOGGING, EXCHANGES, GRPC, GRPC_CLIENT, GRPC_CONVERTER,
        GRPC_SERVER, HTTP, HTTP_CLIENT, HTTP_CONVERTER, HTTP_SERVER, LOGGING, METRICS, MIDDLEWARE,
        RECOVERING, TRACING, TRANSPORT, VALIDATING,
    };
    let group = |name: &str, members: &[&str]| {
        (
            name.to_string(),
            members.iter().map(ToString::to_string).collect(),
        )
    };
    vec![
        group(
            MIDDLEWARE,
            &[
                LOGGING,
                ERROR_LOGGING,
                RECOVERING,
                CACHING,
                TRACING,
                METRICS,
                VALIDATING,
            ],
        ),
        group(HTTP, &[HTTP_SERVER, HTTP_CLIENT, HTTP_CONVERTER]),
        group(GRPC, &[GRPC_SERVER, GRPC_CLIENT, GRPC_CONVERTER]),
        group(TRANSPORT, &[ENDPOINTS, EXCHANGES]),
    ]
}
