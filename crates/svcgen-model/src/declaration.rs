//! Parsed declarations: the input of the model builder.
//!
//! The source parser is an external collaborator; it hands over interfaces,
//! methods, and fields in this shape (usually as JSON). Nothing here is
//! validated yet, that is the builder's job.
//!
//! # Examples
//!
//! ```
//! use svcgen_model::declaration::{ParsedFile, TypeExpr};
//!
//! let file: ParsedFile = serde_json::from_str(r#"{
//!     "package": "users",
//!     "interfaces": [{
//!         "name": "UserService",
//!         "docs": ["// @generate(logging)"],
//!         "methods": [{
//!             "name": "Get",
//!             "params": [
//!                 {"name": "ctx", "type": {"kind": "selector", "package": "context", "name": "Context"}},
//!                 {"name": "id", "type": {"kind": "ident", "name": "string"}}
//!             ],
//!             "results": [
//!                 {"name": "err", "type": {"kind": "ident", "name": "error"}}
//!             ]
//!         }]
//!     }]
//! }"#).unwrap();
//!
//! let method = &file.interfaces[0].methods[0];
//! assert_eq!(method.params[0].ty.to_string(), "context.Context");
//! assert_eq!(method.params[1].ty, TypeExpr::ident("string"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFile {
    /// Package (or module) the interfaces are declared in
    pub package: String,
    /// Interfaces in declaration order
    #[serde(default)]
    pub interfaces: Vec<ParsedInterface>,
}

/// One parsed interface declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInterface {
    /// Interface name
    pub name: String,
    /// Raw documentation comment lines
    #[serde(default)]
    pub docs: Vec<String>,
    /// Names of embedded interfaces
    #[serde(default)]
    pub embeds: Vec<String>,
    /// Methods in declaration order
    #[serde(default)]
    pub methods: Vec<ParsedMethod>,
}

/// One parsed interface method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMethod {
    /// Method name
    pub name: String,
    /// Raw documentation comment lines
    #[serde(default)]
    pub docs: Vec<String>,
    /// Parameters in order, including the leading context
    #[serde(default)]
    pub params: Vec<ParsedField>,
    /// Results in order, including the trailing error
    #[serde(default)]
    pub results: Vec<ParsedField>,
}

/// A parameter or result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedField {
    /// Name; empty when the declaration left it unnamed
    #[serde(default)]
    pub name: String,
    /// Type expression
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    /// Raw documentation comment lines
    #[serde(default)]
    pub docs: Vec<String>,
}

impl ParsedField {
    /// Creates an undocumented field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            docs: Vec::new(),
        }
    }
}

/// Type expression as the source parser saw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeExpr {
    /// Unqualified name: `string`, `User`
    Ident {
        /// Type name
        name: String,
    },
    /// Package-qualified name: `context.Context`
    Selector {
        /// Package qualifier
        package: String,
        /// Type name
        name: String,
    },
    /// `[]T`
    Slice {
        /// Element type
        elem: Box<TypeExpr>,
    },
    /// `...T`
    Ellipsis {
        /// Element type
        elem: Box<TypeExpr>,
    },
    /// `map[K]V`
    Map {
        /// Key type
        key: Box<TypeExpr>,
        /// Value type
        value: Box<TypeExpr>,
    },
    /// `*T`
    Star {
        /// Pointee type
        elem: Box<TypeExpr>,
    },
    /// `[N]T`
    Array {
        /// Length expression
        len: String,
        /// Element type
        elem: Box<TypeExpr>,
    },
    /// `chan T`
    Chan {
        /// Element type
        elem: Box<TypeExpr>,
    },
    /// Function type
    Func,
    /// Anonymous struct type
    Struct,
    /// Anonymous interface type
    Interface,
}

impl TypeExpr {
    /// Shorthand for [`TypeExpr::Ident`].
    #[must_use]
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident { name: name.into() }
    }

    /// Shorthand for [`TypeExpr::Selector`].
    #[must_use]
    pub fn selector(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Selector {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Shorthand for [`TypeExpr::Slice`].
    #[must_use]
    pub fn slice(elem: Self) -> Self {
        Self::Slice {
            elem: Box::new(elem),
        }
    }

    /// Shorthand for [`TypeExpr::Ellipsis`].
    #[must_use]
    pub fn ellipsis(elem: Self) -> Self {
        Self::Ellipsis {
            elem: Box::new(elem),
        }
    }

    /// Shorthand for [`TypeExpr::Map`].
    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Shorthand for [`TypeExpr::Star`].
    #[must_use]
    pub fn star(elem: Self) -> Self {
        Self::Star {
            elem: Box::new(elem),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident { name } => f.write_str(name),
            Self::Selector { package, name } => write!(f, "{package}.{name}"),
            Self::Slice { elem } => write!(f, "[]{elem}"),
            Self::Ellipsis { elem } => write!(f, "...{elem}"),
            Self::Map { key, value } => write!(f, "map[{key}]{value}"),
            Self::Star { elem } => write!(f, "*{elem}"),
            Self::Array { len, elem } => write!(f, "[{len}]{elem}"),
            Self::Chan { elem } => write!(f, "chan {elem}"),
            Self::Func => f.write_str("func"),
            Self::Struct => f.write_str("struct{}"),
            Self::Interface => f.write_str("interface{}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_expr_display() {
        let ty = TypeExpr::map(
            TypeExpr::ident("string"),
            TypeExpr::slice(TypeExpr::star(TypeExpr::selector("models", "User"))),
        );
        assert_eq!(ty.to_string(), "map[string][]*models.User");
        assert_eq!(
            TypeExpr::ellipsis(TypeExpr::ident("int")).to_string(),
            "...int"
        );
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let iface: ParsedInterface = serde_json::from_str(r#"{"name": "EmptyService"}"#).unwrap();
        assert!(iface.docs.is_empty());
        assert!(iface.embeds.is_empty());
        assert!(iface.methods.is_empty());
    }

    #[test]
    fn test_field_deserializes_type_key() {
        let field: ParsedField = serde_json::from_str(
            r#"{"type": {"kind": "slice", "elem": {"kind": "ident", "name": "byte"}}}"#,
        )
        .unwrap();
        assert!(field.name.is_empty());
        assert_eq!(field.ty, TypeExpr::slice(TypeExpr::ident("byte")));
    }
}
