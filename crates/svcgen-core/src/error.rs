//! Error types for svcgen.
//!
//! Every failure the annotation DSL, the model builder, or the generation
//! engine can raise is a variant of [`Error`]. Variants carry the entity,
//! tag or flag name, and the offending value so a failure can be acted on
//! without re-deriving parser state.
//!
//! # Examples
//!
//! ```
//! use svcgen_core::{EntityKind, Error, Result};
//!
//! fn enable(flag: &str) -> Result<()> {
//!     if flag != "logging" {
//!         return Err(Error::InvalidFlagValue {
//!             kind: EntityKind::Method,
//!             entity: "UserService.Get".to_string(),
//!             directive: "enable".to_string(),
//!             value: flag.to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = enable("bogus").unwrap_err();
//! assert!(err.is_invalid_flag_value());
//! ```

use crate::types::EntityKind;
use thiserror::Error;

/// Main error type for svcgen.
///
/// All library crates in the workspace return this type. Tag errors abort
/// only the declaration being parsed; generator errors abort only the
/// enclosing artifact spec.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed tag payload or unbalanced delimiters.
    #[error("malformed tag '{tag}' on {entity}: {reason}")]
    TagSyntax {
        /// Entity the tag was attached to (e.g. `service UserService`)
        entity: String,
        /// Raw tag token or resolved tag name
        tag: String,
        /// What is wrong with it
        reason: String,
    },

    /// No built-in or custom parser matches the tag.
    #[error("unknown tag '{tag}' on {entity}")]
    UnknownTag {
        /// Entity the tag was attached to
        entity: String,
        /// Raw tag token
        tag: String,
    },

    /// The longest matching tag name exists in more than one parser pool.
    #[error("ambiguous tag '{tag}' on {entity}: '{name}' is both built-in and custom")]
    AmbiguousTag {
        /// Entity the tag was attached to
        entity: String,
        /// Raw tag token
        tag: String,
        /// Tag name matched in both pools
        name: String,
    },

    /// A generate directive references a flag or group outside the allowed
    /// universe.
    #[error("invalid value '{value}' for @{directive} on {kind} {entity}")]
    InvalidFlagValue {
        /// Kind of entity the directive was attached to
        kind: EntityKind,
        /// Entity name
        entity: String,
        /// Directive name (`generate`, `enable`, ...)
        directive: String,
        /// First offending flag or group name
        value: String,
    },

    /// Structural problem in the parsed declaration.
    #[error("invalid declaration {entity}: {reason}")]
    ModelValidation {
        /// Entity that failed validation
        entity: String,
        /// Description of the problem
        reason: String,
    },

    /// Generator-defined failure.
    ///
    /// The source is opaque to the engine; it is propagated unchanged to
    /// the caller of the failing spec.
    #[error("generator '{generator}' failed")]
    Generator {
        /// Name of the generator callback that failed
        generator: String,
        /// Underlying error cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Custom tag parser registration rejected.
    #[error("cannot register tag '{name}': {reason}")]
    TagRegistration {
        /// Requested tag name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration error.
    ///
    /// Raised for inconsistent flag universes, duplicate spec names, or an
    /// invalid configuration file.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Template registration or rendering failed.
    #[error("template error: {message}")]
    TemplateError {
        /// Description of the template failure
        message: String,
    },
}

impl Error {
    /// Wraps a generator-defined failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use svcgen_core::Error;
    ///
    /// let err = Error::generator("endpoints", "method has no arguments");
    /// assert!(err.is_generator_error());
    /// assert_eq!(err.to_string(), "generator 'endpoints' failed");
    /// ```
    pub fn generator(
        generator: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Generator {
            generator: generator.into(),
            source: source.into(),
        }
    }

    /// Returns `true` for errors raised while parsing tags.
    ///
    /// Covers syntax, unknown, ambiguous, and invalid flag value errors.
    #[must_use]
    pub const fn is_tag_error(&self) -> bool {
        matches!(
            self,
            Self::TagSyntax { .. }
                | Self::UnknownTag { .. }
                | Self::AmbiguousTag { .. }
                | Self::InvalidFlagValue { .. }
        )
    }

    /// Returns `true` if this is a tag syntax error.
    #[must_use]
    pub const fn is_tag_syntax_error(&self) -> bool {
        matches!(self, Self::TagSyntax { .. })
    }

    /// Returns `true` if this is an unknown tag error.
    #[must_use]
    pub const fn is_unknown_tag(&self) -> bool {
        matches!(self, Self::UnknownTag { .. })
    }

    /// Returns `true` if this is an ambiguous tag error.
    #[must_use]
    pub const fn is_ambiguous_tag(&self) -> bool {
        matches!(self, Self::AmbiguousTag { .. })
    }

    /// Returns `true` if this is an invalid flag value error.
    #[must_use]
    pub const fn is_invalid_flag_value(&self) -> bool {
        matches!(self, Self::InvalidFlagValue { .. })
    }

    /// Returns `true` if this is a model validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use svcgen_core::Error;
    ///
    /// let err = Error::ModelValidation {
    ///     entity: "method UserService.Get".to_string(),
    ///     reason: "first parameter must be context.Context".to_string(),
    /// };
    /// assert!(err.is_model_validation_error());
    /// assert!(!err.is_tag_error());
    /// ```
    #[must_use]
    pub const fn is_model_validation_error(&self) -> bool {
        matches!(self, Self::ModelValidation { .. })
    }

    /// Returns `true` if this is a generator error.
    #[must_use]
    pub const fn is_generator_error(&self) -> bool {
        matches!(self, Self::Generator { .. })
    }

    /// Returns `true` if this is a tag registration error.
    #[must_use]
    pub const fn is_registration_error(&self) -> bool {
        matches!(self, Self::TagRegistration { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a template error.
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::TemplateError { .. })
    }
}

/// Result type alias for svcgen operations.
pub type Result<T> = std::result::Result<T, Error>;
