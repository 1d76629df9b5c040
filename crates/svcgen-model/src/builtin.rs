//! Built-in tag names and payload parsing.
//!
//! The model builder applies built-in tags directly to the entity being
//! built; the helpers here only turn payload text into values and report
//! malformed payloads as [`Error::TagSyntax`].

use regex::Regex;
use std::sync::LazyLock;
use svcgen_core::{Error, Result};
use svcgen_tags::split;

/// `@generate(flags)`: ONLY on the service set.
pub const GENERATE: &str = "generate";
/// `@generate-all(flags)`: ALL-BUT with `enabled = true` on the service set.
pub const GENERATE_ALL: &str = "generate-all";
/// `@enable(flags)`: ADD on the method set.
pub const ENABLE: &str = "enable";
/// `@disable(flags)`: REMOVE on the method set.
pub const DISABLE: &str = "disable";
/// `@enable-all(flags)`: ALL-BUT with `enabled = true` on the method set.
pub const ENABLE_ALL: &str = "enable-all";
/// `@disable-all(flags)`: ALL-BUT with `enabled = false` on the method set.
pub const DISABLE_ALL: &str = "disable-all";
/// `@alias(name)`, or `@alias(field, name)` on methods.
pub const ALIAS: &str = "alias";
/// `@http-prefix(/path)` on services.
pub const HTTP_PREFIX: &str = "http-prefix";
/// `@http-method(VERB)` on methods.
pub const HTTP_METHOD: &str = "http-method";
/// `@http-path(/path/{arg})` on methods.
pub const HTTP_PATH: &str = "http-path";
/// `@params([names], (tags))` on methods.
pub const PARAMS: &str = "params";
/// `@logs-ignore(names)` on methods.
pub const LOGS_IGNORE: &str = "logs-ignore";
/// `@logs-len(names)` on methods.
pub const LOGS_LEN: &str = "logs-len";
/// `@http-origin(BODY|HEADER|QUERY|PATH)` on parameters.
pub const HTTP_ORIGIN: &str = "http-origin";

/// Built-in service tags.
pub const SERVICE_TAGS: &[&str] = &[GENERATE, GENERATE_ALL, ALIAS, HTTP_PREFIX];

/// Built-in method tags.
pub const METHOD_TAGS: &[&str] = &[
    ENABLE,
    DISABLE,
    ENABLE_ALL,
    DISABLE_ALL,
    ALIAS,
    PARAMS,
    LOGS_IGNORE,
    LOGS_LEN,
    HTTP_METHOD,
    HTTP_PATH,
];

/// Built-in parameter tags.
pub const PARAM_TAGS: &[&str] = &[ALIAS, HTTP_ORIGIN];

/// Verbs accepted by `@http-method`.
pub const HTTP_VERBS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("valid regex"));
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(?::[^}]*)?\}").expect("valid regex"));

/// Target of an `@alias` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Alias {
    /// Renames the tagged entity
    Own(String),
    /// Renames an argument or result of the tagged method
    Field { field: String, alias: String },
}

/// Parsed `@params` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParamsTag {
    pub names: Vec<String>,
    /// Parameter tag tokens, each starting with `@`
    pub tags: Vec<String>,
}

pub(crate) fn syntax(entity: &str, tag: &str, reason: impl Into<String>) -> Error {
    Error::TagSyntax {
        entity: entity.to_string(),
        tag: tag.to_string(),
        reason: reason.into(),
    }
}

/// Comma-separated names; a missing payload is an empty list.
pub(crate) fn names(payload: Option<&str>) -> Vec<String> {
    split(payload.unwrap_or_default(), ",")
}

pub(crate) fn required_names(entity: &str, tag: &str, payload: Option<&str>) -> Result<Vec<String>> {
    let names = names(payload);
    if names.is_empty() {
        return Err(syntax(entity, tag, "expects at least one name"));
    }
    Ok(names)
}

fn name(entity: &str, tag: &str, value: &str) -> Result<String> {
    if NAME_REGEX.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(syntax(entity, tag, format!("'{value}' is not a valid name")))
    }
}

pub(crate) fn single_name(entity: &str, tag: &str, payload: Option<&str>) -> Result<String> {
    match names(payload).as_slice() {
        [one] => name(entity, tag, one),
        [] => Err(syntax(entity, tag, "expects a name")),
        _ => Err(syntax(entity, tag, "expects exactly one name")),
    }
}

pub(crate) fn alias(entity: &str, tag: &str, payload: Option<&str>) -> Result<Alias> {
    match names(payload).as_slice() {
        [own] => Ok(Alias::Own(name(entity, tag, own)?)),
        [field, alias] => Ok(Alias::Field {
            field: name(entity, tag, field)?,
            alias: name(entity, tag, alias)?,
        }),
        _ => Err(syntax(entity, tag, "expects 'name' or 'field, name'")),
    }
}

pub(crate) fn http_verb(entity: &str, tag: &str, payload: Option<&str>) -> Result<String> {
    let verb = single_name(entity, tag, payload)?.to_ascii_uppercase();
    if HTTP_VERBS.contains(&verb.as_str()) {
        Ok(verb)
    } else {
        Err(syntax(
            entity,
            tag,
            format!("unknown HTTP method '{verb}', expected one of {}", HTTP_VERBS.join(", ")),
        ))
    }
}

pub(crate) fn http_path(entity: &str, tag: &str, payload: Option<&str>) -> Result<String> {
    let path = payload.unwrap_or_default().trim();
    if !path.starts_with('/') {
        return Err(syntax(entity, tag, "path must start with '/'"));
    }
    if path.chars().any(char::is_whitespace) {
        return Err(syntax(entity, tag, "path cannot contain whitespace"));
    }
    svcgen_tags::check_balanced(path).map_err(|e| syntax(entity, tag, e.to_string()))?;
    Ok(path.to_string())
}

/// Names of `{placeholder}` segments in an HTTP path, in order.
///
/// A `{name:pattern}` placeholder yields `name`.
#[must_use]
pub fn path_placeholders(path: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .captures_iter(path)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

pub(crate) fn params(entity: &str, tag: &str, payload: Option<&str>) -> Result<ParamsTag> {
    let parts = split(payload.unwrap_or_default(), ",");
    let [names_part, tags_part] = parts.as_slice() else {
        return Err(syntax(entity, tag, "expects '[names], (tags)'"));
    };

    let names = match names_part
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
    {
        Some(inner) => split(inner, ","),
        None => vec![names_part.clone()],
    };
    if names.is_empty() {
        return Err(syntax(entity, tag, "expects at least one parameter name"));
    }
    let names = names
        .iter()
        .map(|n| name(entity, tag, n))
        .collect::<Result<Vec<_>>>()?;

    let Some(inner) = tags_part
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
    else {
        return Err(syntax(entity, tag, "parameter tags must be wrapped in '(...)'"));
    };
    let tags: Vec<String> = split(inner, ",")
        .into_iter()
        .map(|t| if t.starts_with('@') { t } else { format!("@{t}") })
        .collect();
    if tags.is_empty() {
        return Err(syntax(entity, tag, "expects at least one parameter tag"));
    }

    Ok(ParamsTag { names, tags })
}
