//! Resolved service graph.
//!
//! Built once per declaration by [`ServiceModelBuilder`](crate::ServiceModelBuilder)
//! and read-only afterwards. A [`Method`] refers to its owner by name only;
//! generators receive `&Service` alongside `&Method`.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use svcgen_core::{Error, Result};
use svcgen_tags::{GenerateSet, TagsOptions};

/// Type names treated as language built-ins.
pub const BUILTIN_TYPES: &[&str] = &[
    "bool",
    "string",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
    "float32",
    "float64",
    "complex64",
    "complex128",
    "byte",
    "rune",
    "error",
    "any",
];

/// Type descriptor of an argument or result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    /// Language built-in such as `string` or `int64`
    Builtin {
        /// Type name
        name: String,
    },
    /// Named type, declared locally (`package: None`) or imported
    Imported {
        /// Package qualifier
        package: Option<String>,
        /// Type name
        name: String,
    },
    /// Sequence of elements
    Slice {
        /// Element type
        elem: Box<Type>,
    },
    /// Trailing variadic parameter
    Variadic {
        /// Element type
        elem: Box<Type>,
    },
    /// Key/value map
    Map {
        /// Key type
        key: Box<Type>,
        /// Value type
        value: Box<Type>,
    },
    /// Reference to a value
    Pointer {
        /// Pointee type
        elem: Box<Type>,
    },
    /// Raw byte sequence
    Bytes,
}

impl Type {
    /// Returns `true` for sequence-like types (`Slice`, `Variadic`, `Bytes`).
    ///
    /// `logs-len` only makes sense for these and maps.
    #[must_use]
    pub const fn has_len(&self) -> bool {
        matches!(
            self,
            Self::Slice { .. } | Self::Variadic { .. } | Self::Bytes | Self::Map { .. }
        )
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin { name } | Self::Imported { package: None, name } => f.write_str(name),
            Self::Imported {
                package: Some(package),
                name,
            } => write!(f, "{package}.{name}"),
            Self::Slice { elem } => write!(f, "[]{elem}"),
            Self::Variadic { elem } => write!(f, "...{elem}"),
            Self::Map { key, value } => write!(f, "map[{key}]{value}"),
            Self::Pointer { elem } => write!(f, "*{elem}"),
            Self::Bytes => f.write_str("[]byte"),
        }
    }
}

/// Where an HTTP transport reads an argument from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpOrigin {
    /// Request body
    #[default]
    Body,
    /// Request header
    Header,
    /// Query string
    Query,
    /// Path placeholder
    Path,
}

impl HttpOrigin {
    /// Upper-case name as written in tags.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Body => "BODY",
            Self::Header => "HEADER",
            Self::Query => "QUERY",
            Self::Path => "PATH",
        }
    }
}

impl fmt::Display for HttpOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpOrigin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BODY" => Ok(Self::Body),
            "HEADER" => Ok(Self::Header),
            "QUERY" => Ok(Self::Query),
            "PATH" => Ok(Self::Path),
            other => Err(Error::ConfigError {
                message: format!("unknown http origin '{other}', expected BODY, HEADER, QUERY, or PATH"),
            }),
        }
    }
}

/// Optional behaviour a service declares by embedding a known interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Service exposes a request validator
    Validator,
}

impl Capability {
    /// Maps an embedded interface name to a capability.
    ///
    /// Qualified names (`pkg.Validator`) match on the final segment.
    #[must_use]
    pub fn from_embed(name: &str) -> Option<Self> {
        let base = name.rsplit('.').next().unwrap_or(name);
        match base {
            "Validator" => Some(Self::Validator),
            _ => None,
        }
    }

    /// Lower-case capability name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validator => "validator",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities resolved from embedded interfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Capabilities(Vec<Capability>);

impl Capabilities {
    /// Resolves capabilities from embedded interface names.
    ///
    /// Unknown embeds are skipped; duplicates collapse.
    #[must_use]
    pub fn from_embeds<S: AsRef<str>>(embeds: &[S]) -> Self {
        let mut caps: Vec<Capability> = embeds
            .iter()
            .filter_map(|e| Capability::from_embed(e.as_ref()))
            .collect();
        caps.sort_unstable();
        caps.dedup();
        Self(caps)
    }

    /// Returns `true` if the service has `capability`.
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Iterates capabilities in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    /// Returns `true` if no capability was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A method argument (the context parameter excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    /// Declared name
    pub name: String,
    /// External name; defaults to `name`
    pub alias: String,
    /// Type descriptor
    #[serde(rename = "type")]
    pub ty: Type,
    /// HTTP origin classification
    pub http_origin: HttpOrigin,
    /// Prose documentation lines
    pub docs: Vec<String>,
    /// Options from custom parameter tags
    pub tags: TagsOptions,
}

/// A method result (the trailing error excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Declared name
    pub name: String,
    /// External name; defaults to `name`
    pub alias: String,
    /// Type descriptor
    #[serde(rename = "type")]
    pub ty: Type,
}

/// A service method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    /// Name of the owning service
    pub service: String,
    /// Declared name
    pub name: String,
    /// External name; defaults to `name`
    pub alias: String,
    /// Prose documentation lines
    pub docs: Vec<String>,
    /// Arguments in declaration order
    pub arguments: Vec<Argument>,
    /// Results in declaration order
    pub results: Vec<Field>,
    /// Enabled generate flags
    pub generate: GenerateSet,
    /// HTTP verb, upper-case
    pub http_method: Option<String>,
    /// HTTP path, relative to the service prefix
    pub http_path: Option<String>,
    /// Argument or result names excluded from logs
    pub logs_ignore: Vec<String>,
    /// Argument or result names logged by length only
    pub logs_len: Vec<String>,
    /// Options from custom method tags
    pub tags: TagsOptions,
}

impl Method {
    /// Returns `true` if `flag` is enabled on this method.
    #[must_use]
    pub fn is_enabled(&self, flag: &str) -> bool {
        self.generate.contains(flag)
    }

    /// Looks up an argument by declared name.
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Looks up a result by declared name.
    #[must_use]
    pub fn result(&self, name: &str) -> Option<&Field> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Returns `true` if `name` is an argument or result of this method.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.argument(name).is_some() || self.result(name).is_some()
    }
}

/// A resolved service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    /// Declared interface name
    pub name: String,
    /// External name; defaults to `name`
    pub alias: String,
    /// Package the interface is declared in
    pub package: String,
    /// Prose documentation lines
    pub docs: Vec<String>,
    /// Methods in declaration order
    pub methods: Vec<Method>,
    /// Enabled generate flags
    pub generate: GenerateSet,
    /// URI prefix for HTTP transports
    pub http_prefix: Option<String>,
    /// Capabilities from embedded interfaces
    pub capabilities: Capabilities,
    /// Options from custom service tags
    pub tags: TagsOptions,
}

impl Service {
    /// Returns `true` if `flag` is enabled on the service itself.
    #[must_use]
    pub fn is_enabled(&self, flag: &str) -> bool {
        self.generate.contains(flag)
    }

    /// Returns `true` if `flag` is enabled on the service or any method.
    #[must_use]
    pub fn is_enabled_anywhere(&self, flag: &str) -> bool {
        self.is_enabled(flag) || self.methods.iter().any(|m| m.is_enabled(flag))
    }

    /// Looks up a method by declared name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Returns `true` if the service has `capability`.
    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.has(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin(name: &str) -> Type {
        Type::Builtin {
            name: name.to_string(),
        }
    }

    // ========================================================================
    // Type Tests
    // ========================================================================

    #[test]
    fn test_type_display() {
        let ty = Type::Map {
            key: Box::new(builtin("string")),
            value: Box::new(Type::Pointer {
                elem: Box::new(Type::Imported {
                    package: Some("models".to_string()),
                    name: "User".to_string(),
                }),
            }),
        };
        assert_eq!(ty.to_string(), "map[string]*models.User");
        assert_eq!(Type::Bytes.to_string(), "[]byte");
    }

    #[test]
    fn test_type_has_len() {
        assert!(Type::Bytes.has_len());
        assert!(
            Type::Slice {
                elem: Box::new(builtin("int"))
            }
            .has_len()
        );
        assert!(!builtin("string").has_len());
    }

    #[test]
    fn test_type_serializes_with_kind() {
        let json = serde_json::to_value(builtin("int")).unwrap();
        assert_eq!(json["kind"], "builtin");
        assert_eq!(json["name"], "int");
    }

    // ========================================================================
    // HttpOrigin Tests
    // ========================================================================

    #[test]
    fn test_http_origin_from_str() {
        assert_eq!("query".parse::<HttpOrigin>().unwrap(), HttpOrigin::Query);
        assert_eq!(" PATH ".parse::<HttpOrigin>().unwrap(), HttpOrigin::Path);
        assert!("cookie".parse::<HttpOrigin>().is_err());
    }

    #[test]
    fn test_http_origin_default_is_body() {
        assert_eq!(HttpOrigin::default(), HttpOrigin::Body);
    }

    // ========================================================================
    // Capability Tests
    // ========================================================================

    #[test]
    fn test_capabilities_from_embeds() {
        let caps = Capabilities::from_embeds(&["io.Closer", "validate.Validator", "Validator"]);
        assert!(caps.has(Capability::Validator));
        assert_eq!(caps.iter().count(), 1);
    }

    #[test]
    fn test_capabilities_empty() {
        let caps = Capabilities::from_embeds(&["Stringer"]);
        assert!(caps.is_empty());
    }
}
