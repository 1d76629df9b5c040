//! Configuration types for the service model.
//!
//! # Examples
//!
//! ```
//! use svcgen_core::ModelConfig;
//!
//! let config = ModelConfig::default();
//! assert_eq!(config.service_suffix, "Service");
//! assert_eq!(config.context_type, "context.Context");
//!
//! let custom = ModelConfig {
//!     service_suffix: String::new(),
//!     ..Default::default()
//! };
//! assert!(custom.is_service_name("Accounts"));
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Declaration conventions enforced by the service model builder.
///
/// Deserializes from the `[model]` section of `svcgen.toml`; every field
/// is optional there and falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Required suffix of service interface names.
    ///
    /// An empty suffix only requires an exported identifier.
    /// Default: `Service`
    pub service_suffix: String,

    /// Type every method must take as its first parameter.
    ///
    /// Default: `context.Context`
    pub context_type: String,

    /// Type every method must return last.
    ///
    /// Default: `error`
    pub error_type: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            service_suffix: "Service".to_string(),
            context_type: "context.Context".to_string(),
            error_type: "error".to_string(),
        }
    }
}

impl ModelConfig {
    /// Checks an interface name against the service naming convention.
    ///
    /// The name must be an exported identifier (leading uppercase ASCII
    /// letter, then letters, digits or `_`) ending with
    /// [`service_suffix`](Self::service_suffix), and must be longer than
    /// the suffix alone.
    ///
    /// # Examples
    ///
    /// ```
    /// use svcgen_core::ModelConfig;
    ///
    /// let config = ModelConfig::default();
    /// assert!(config.is_service_name("UserService"));
    /// assert!(!config.is_service_name("userService"));
    /// assert!(!config.is_service_name("UserRepo"));
    /// assert!(!config.is_service_name("Service"));
    /// ```
    #[must_use]
    pub fn is_service_name(&self, name: &str) -> bool {
        let exported = name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        exported
            && name.ends_with(self.service_suffix.as_str())
            && name.len() > self.service_suffix.len()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the context or error type is empty.
    pub fn validate(&self) -> Result<()> {
        if self.context_type.trim().is_empty() {
            return Err(Error::ConfigError {
                message: "context_type cannot be empty".to_string(),
            });
        }
        if self.error_type.trim().is_empty() {
            return Err(Error::ConfigError {
                message: "error_type cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ModelConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_context_type_rejected() {
        let config = ModelConfig {
            context_type: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().is_config_error());
    }

    #[test]
    fn test_empty_error_type_rejected() {
        let config = ModelConfig {
            error_type: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_service_name_convention() {
        let config = ModelConfig::default();
        assert!(config.is_service_name("StringService"));
        assert!(config.is_service_name("V2_Service"));
        assert!(!config.is_service_name(""));
        assert!(!config.is_service_name("stringService"));
        assert!(!config.is_service_name("String-Service"));
        assert!(!config.is_service_name("Strings"));
    }

    #[test]
    fn test_empty_suffix_only_requires_exported_name() {
        let config = ModelConfig {
            service_suffix: String::new(),
            ..Default::default()
        };
        assert!(config.is_service_name("Accounts"));
        assert!(!config.is_service_name("accounts"));
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: ModelConfig = serde_json::from_str(r#"{"error_type": "Error"}"#).unwrap();
        assert_eq!(config.error_type, "Error");
        assert_eq!(config.service_suffix, "Service");
        assert_eq!(config.context_type, "context.Context");
    }
}
