//! Integration tests for the error taxonomy and shared configuration.

use std::error::Error as _;
use svcgen_core::{EntityKind, Error, ModelConfig, TagName};

fn all_variants() -> Vec<Error> {
    vec![
        Error::TagSyntax {
            entity: "service UserService".to_string(),
            tag: "@params".to_string(),
            reason: "unbalanced '('".to_string(),
        },
        Error::UnknownTag {
            entity: "method UserService.Get".to_string(),
            tag: "@nope".to_string(),
        },
        Error::AmbiguousTag {
            entity: "method UserService.Get".to_string(),
            tag: "@alias(x)".to_string(),
            name: "alias".to_string(),
        },
        Error::InvalidFlagValue {
            kind: EntityKind::Method,
            entity: "UserService.Get".to_string(),
            directive: "disable".to_string(),
            value: "loging".to_string(),
        },
        Error::ModelValidation {
            entity: "interface userRepo".to_string(),
            reason: "name must end with 'Service'".to_string(),
        },
        Error::generator("endpoints", "boom"),
        Error::TagRegistration {
            name: "alias".to_string(),
            reason: "collides with a built-in tag".to_string(),
        },
        Error::ConfigError {
            message: "spec 'logging' registered twice".to_string(),
        },
        Error::TemplateError {
            message: "missing variable".to_string(),
        },
    ]
}

/// Every variant answers exactly one specific classifier
#[test]
fn test_classifiers_are_exclusive() {
    for err in all_variants() {
        let hits = [
            err.is_tag_syntax_error(),
            err.is_unknown_tag(),
            err.is_ambiguous_tag(),
            err.is_invalid_flag_value(),
            err.is_model_validation_error(),
            err.is_generator_error(),
            err.is_registration_error(),
            err.is_config_error(),
            err.is_template_error(),
        ];
        assert_eq!(hits.iter().filter(|h| **h).count(), 1, "{err}");
    }
}

/// Only the four tag-parsing variants are tag errors
#[test]
fn test_tag_error_family() {
    let tag_errors = all_variants().iter().filter(|e| e.is_tag_error()).count();
    assert_eq!(tag_errors, 4);
}

/// Messages carry the entity, directive, and offending value
#[test]
fn test_messages_are_actionable() {
    let variants = all_variants();
    assert_eq!(
        variants[3].to_string(),
        "invalid value 'loging' for @disable on method UserService.Get"
    );
    assert!(variants[2].to_string().contains("'alias' is both built-in and custom"));
    assert!(variants[0].to_string().contains("service UserService"));
}

/// Generator errors keep their source unchanged
#[test]
fn test_generator_source_chain() {
    let err = Error::generator("endpoints", "method has no arguments");
    assert_eq!(
        err.source().map(ToString::to_string).as_deref(),
        Some("method has no arguments")
    );
}

/// Config deserializes with per-field defaults
#[test]
fn test_model_config_partial_json() {
    let config: ModelConfig = serde_json::from_str(r#"{"service_suffix": "Api"}"#).unwrap();
    assert_eq!(config.service_suffix, "Api");
    assert_eq!(config.context_type, ModelConfig::default().context_type);
    assert!(config.is_service_name("UsersApi"));
    assert!(config.validate().is_ok());
}

/// Tag names normalize to lowercase and reject foreign characters
#[test]
fn test_tag_name_rules() {
    assert_eq!(TagName::new("HTTP-Path").unwrap().as_str(), "http-path");
    assert!(TagName::new("").is_err());
    assert!(TagName::new("with space").is_err());
    assert!(TagName::new("dots.not.allowed").is_err());
}

/// Unknown output formats are configuration errors naming the input
#[test]
fn test_output_format_parsing() {
    use svcgen_core::cli::{ExitCode, OutputFormat};

    assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    let err = "yaml".parse::<OutputFormat>().unwrap_err();
    assert!(err.is_config_error());
    assert!(err.to_string().contains("yaml"));

    assert!(ExitCode::default().is_success());
    assert_eq!(i32::from(ExitCode::PARTIAL), 3);
    assert!(!ExitCode::INVALID_INPUT.is_success());
}
