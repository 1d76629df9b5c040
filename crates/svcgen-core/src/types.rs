//! Strong domain types for svcgen.
//!
//! # Examples
//!
//! ```
//! use svcgen_core::{EntityKind, TagName};
//!
//! let tag = TagName::new("http-origin").unwrap();
//! assert_eq!(tag.as_str(), "http-origin");
//! assert_eq!(EntityKind::Param.to_string(), "param");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of declaration entity a tag or directive is attached to.
///
/// Each kind owns its own flag universe and tag parser pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Service interface
    Service,
    /// Service method
    Method,
    /// Method parameter
    Param,
}

impl EntityKind {
    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Method => "method",
            Self::Param => "param",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated tag name (newtype over String).
///
/// Tag names are non-empty and consist only of ASCII letters, digits,
/// `-` and `_`. They are compared case-insensitively during dispatch, so
/// the stored form is lowercase.
///
/// # Examples
///
/// ```
/// use svcgen_core::TagName;
///
/// assert_eq!(TagName::new("Logs-Len").unwrap().as_str(), "logs-len");
/// assert!(TagName::new("").is_err());
/// assert!(TagName::new("with space").is_err());
/// assert!(TagName::new("paren(").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagName(String);

impl TagName {
    /// Creates a tag name after validating its characters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagRegistration`] if the name is empty or contains
    /// characters outside `[A-Za-z0-9-_]`.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(Error::TagRegistration {
                name: name.to_string(),
                reason: "tag name cannot be empty".to_string(),
            });
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(Error::TagRegistration {
                name: name.to_string(),
                reason: format!("character '{c}' is outside [A-Za-z0-9-_]"),
            });
        }
        Ok(Self(name.to_ascii_lowercase()))
    }

    /// Returns the tag name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `TagName` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
