//! Tag token resolution.
//!
//! A raw token such as `@logs-len(items)` is matched against the names of
//! the built-in and custom parser pools by longest prefix, so a custom
//! `name-extended` tag is never shadowed by a built-in `name`.
//!
//! # Examples
//!
//! ```
//! use svcgen_tags::dispatch::{resolve, TagPool};
//!
//! let resolved = resolve("@name-extended(x)", &["name"], &["name-extended"]).unwrap();
//! assert_eq!(resolved.pool, TagPool::Custom);
//! assert_eq!(resolved.name, "name-extended");
//! assert_eq!(resolved.payload.as_deref(), Some("x"));
//! ```

use crate::splitter::check_balanced;
use thiserror::Error;

/// Parser pool a tag name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagPool {
    /// Tags understood by the model builder itself
    Builtin,
    /// Tags registered through the extension API
    Custom,
}

/// A resolved tag invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag {
    /// Pool the matched parser lives in
    pub pool: TagPool,
    /// Matched tag name, as registered
    pub name: String,
    /// Text between the outer parentheses, if any
    pub payload: Option<String>,
}

/// Failure to resolve a tag token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No registered name prefixes the token.
    #[error("no parser matches")]
    Unknown,

    /// The longest match exists in both pools.
    #[error("'{name}' is registered as both built-in and custom")]
    Ambiguous {
        /// The tied name
        name: String,
    },

    /// The text after the tag name is not a single `(...)` payload.
    #[error("{reason}")]
    Syntax {
        /// The matched tag name
        name: String,
        /// What is wrong with the remainder
        reason: String,
    },
}

/// Resolves `token` to a parser by longest case-insensitive prefix match.
///
/// Among all names `n` in both pools such that `token` starts with
/// `"@" + n`, the longest wins. Equal-length matches in both pools are
/// [`ResolveError::Ambiguous`]; no match is [`ResolveError::Unknown`].
/// The remainder after the name must be empty or one balanced
/// parenthesized payload.
///
/// # Errors
///
/// Returns [`ResolveError`] as described above.
///
/// # Examples
///
/// ```
/// use svcgen_tags::dispatch::{resolve, ResolveError, TagPool};
///
/// let resolved = resolve("@Generate-All", &["generate", "generate-all"], &[] as &[&str]).unwrap();
/// assert_eq!(resolved.name, "generate-all");
/// assert_eq!(resolved.pool, TagPool::Builtin);
/// assert_eq!(resolved.payload, None);
///
/// let err = resolve("@nope", &["generate"], &[] as &[&str]).unwrap_err();
/// assert_eq!(err, ResolveError::Unknown);
/// ```
pub fn resolve<B, C>(token: &str, builtin: &[B], custom: &[C]) -> Result<ResolvedTag, ResolveError>
where
    B: AsRef<str>,
    C: AsRef<str>,
{
    let builtin_match = longest_match(token, builtin);
    let custom_match = longest_match(token, custom);

    let (pool, name) = match (builtin_match, custom_match) {
        (None, None) => return Err(ResolveError::Unknown),
        (Some(b), None) => (TagPool::Builtin, b),
        (None, Some(c)) => (TagPool::Custom, c),
        (Some(b), Some(c)) => match b.len().cmp(&c.len()) {
            std::cmp::Ordering::Greater => (TagPool::Builtin, b),
            std::cmp::Ordering::Less => (TagPool::Custom, c),
            std::cmp::Ordering::Equal => {
                return Err(ResolveError::Ambiguous {
                    name: b.to_string(),
                });
            }
        },
    };

    // `name` matched on ASCII bytes right after '@', so this is a char boundary.
    let rest = &token[1 + name.len()..];
    let payload = extract_payload(rest).map_err(|reason| ResolveError::Syntax {
        name: name.to_string(),
        reason,
    })?;

    Ok(ResolvedTag {
        pool,
        name: name.to_string(),
        payload,
    })
}

fn longest_match<'a, S: AsRef<str>>(token: &str, names: &'a [S]) -> Option<&'a str> {
    let body = token.strip_prefix('@')?;
    names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| {
            !name.is_empty()
                && body
                    .as_bytes()
                    .get(..name.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(name.as_bytes()))
        })
        .max_by_key(|name| name.len())
}

/// Extracts the payload from the text that follows a tag name.
fn extract_payload(rest: &str) -> Result<Option<String>, String> {
    if rest.is_empty() {
        return Ok(None);
    }
    if !rest.starts_with('(') {
        return Err(format!("unexpected text '{rest}' after tag name"));
    }
    check_balanced(rest).map_err(|e| format!("unbalanced payload: {e}"))?;

    let mut depth = 0usize;
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    if i + 1 != rest.len() {
                        return Err(format!(
                            "unexpected text '{}' after payload",
                            &rest[i + 1..]
                        ));
                    }
                    return Ok(Some(rest[1..i].trim().to_string()));
                }
            }
            _ => {}
        }
    }
    Err("unbalanced payload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    // ========================================================================
    // Longest-prefix matching
    // ========================================================================

    #[test]
    fn test_custom_extension_beats_shorter_builtin() {
        let resolved = resolve("@name-extended(x)", &["name"], &["name-extended"]).unwrap();
        assert_eq!(resolved.pool, TagPool::Custom);
        assert_eq!(resolved.name, "name-extended");
        assert_eq!(resolved.payload.as_deref(), Some("x"));
    }

    #[test]
    fn test_builtin_wins_when_longer() {
        let resolved = resolve("@enable-all", &["enable-all", "enable"], &["enable-a"]).unwrap();
        assert_eq!(resolved.pool, TagPool::Builtin);
        assert_eq!(resolved.name, "enable-all");
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let resolved = resolve("@HTTP-Origin(query)", &["http-origin"], NONE).unwrap();
        assert_eq!(resolved.name, "http-origin");
        assert_eq!(resolved.payload.as_deref(), Some("query"));
    }

    #[test]
    fn test_tie_across_pools_is_ambiguous() {
        let err = resolve("@alias(x)", &["alias"], &["alias"]).unwrap_err();
        assert_eq!(
            err,
            ResolveError::Ambiguous {
                name: "alias".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(
            resolve("@mystery", &["generate"], &["custom"]).unwrap_err(),
            ResolveError::Unknown
        );
    }

    #[test]
    fn test_token_without_at_is_unknown() {
        assert_eq!(
            resolve("generate", &["generate"], NONE).unwrap_err(),
            ResolveError::Unknown
        );
    }

    #[test]
    fn test_non_ascii_token_does_not_panic() {
        assert_eq!(
            resolve("@é", &["e"], NONE).unwrap_err(),
            ResolveError::Unknown
        );
    }

    // ========================================================================
    // Payload extraction
    // ========================================================================

    #[test]
    fn test_nested_payload() {
        let resolved = resolve("@params([a, b], (http-origin(QUERY)))", &["params"], NONE).unwrap();
        assert_eq!(
            resolved.payload.as_deref(),
            Some("[a, b], (http-origin(QUERY))")
        );
    }

    #[test]
    fn test_empty_payload() {
        let resolved = resolve("@generate()", &["generate"], NONE).unwrap();
        assert_eq!(resolved.payload.as_deref(), Some(""));
    }

    #[test]
    fn test_trailing_text_after_name() {
        let err = resolve("@generates", &["generate"], NONE).unwrap_err();
        assert!(matches!(err, ResolveError::Syntax { ref name, .. } if name == "generate"));
    }

    #[test]
    fn test_trailing_text_after_payload() {
        let err = resolve("@generate(a)b", &["generate"], NONE).unwrap_err();
        assert!(matches!(err, ResolveError::Syntax { .. }));
    }

    #[test]
    fn test_unbalanced_payload() {
        let err = resolve("@generate(a", &["generate"], NONE).unwrap_err();
        let ResolveError::Syntax { reason, .. } = err else {
            panic!("expected syntax error");
        };
        assert!(reason.contains("unbalanced"));
    }

    #[test]
    fn test_unbalanced_inner_brackets() {
        let err = resolve("@params([a, b)", &["params"], NONE).unwrap_err();
        assert!(matches!(err, ResolveError::Syntax { .. }));
    }
}
