//! Documentation comment classification.
//!
//! Splits raw comment lines into tag tokens (`@name(...)`) and prose. The
//! escape marker `##` forces the token right after it into prose, so
//! documentation can mention `@something` literally.
//!
//! # Comment Format
//!
//! ```text
//! // UserService manages accounts.
//! // @generate(middleware, http)
//! // Mention ## @generate without applying it.
//! ```
//!
//! # Examples
//!
//! ```
//! use svcgen_tags::doc::classify;
//!
//! let doc = classify(&["// @foo(1) hello ## @bar world"]);
//! assert_eq!(doc.tags, vec!["@foo(1)"]);
//! assert_eq!(doc.docs, vec!["hello", "@bar", "world"]);
//! ```

use crate::splitter::{Unbalanced, check_balanced};
use serde::Serialize;

/// Token that forces the following token into prose.
pub const ESCAPE_MARKER: &str = "##";

/// Column width prose is rewrapped to.
pub const DOC_WIDTH: usize = 80;

/// Result of classifying a documentation comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocComment {
    /// Tag tokens in source order, e.g. `@generate(logging)`
    pub tags: Vec<String>,
    /// Prose tokens in source order
    pub docs: Vec<String>,
}

impl DocComment {
    /// Rewraps the prose tokens into lines of at most [`DOC_WIDTH`] columns.
    #[must_use]
    pub fn wrapped_docs(&self) -> Vec<String> {
        wrap(&self.docs, DOC_WIDTH)
    }
}

/// Classifies raw comment lines into tags and prose.
///
/// Lines are normalized first: comment delimiters (`//`, `/*`, `*/`, and a
/// leading `*` on block continuation lines) are stripped and tabs become
/// spaces. Words are then read in order. A word starting with `@` whose
/// brackets are still open absorbs the following words, across lines,
/// until [`check_balanced`] accepts it or reports a closing bracket with no
/// opener, so a tag payload containing spaces stays one token. Brackets in
/// prose never join words, so `a) first` or `id -> name` cannot hide a tag
/// that follows.
///
/// A trailing escape marker with no following token is dropped. A tag still
/// open at the end of the comment is kept as written, which the dispatcher
/// then reports as malformed.
#[must_use]
pub fn classify<S: AsRef<str>>(lines: &[S]) -> DocComment {
    let mut tokens = Vec::new();
    let mut open_tag: Option<String> = None;
    for line in lines {
        for word in normalize_line(line.as_ref()).split_whitespace() {
            let token = match open_tag.take() {
                Some(mut tag) => {
                    tag.push(' ');
                    tag.push_str(word);
                    tag
                }
                None if word.starts_with('@') => word.to_string(),
                None => {
                    tokens.push(word.to_string());
                    continue;
                }
            };
            if matches!(check_balanced(&token), Err(Unbalanced::Unclosed { .. })) {
                open_tag = Some(token);
            } else {
                tokens.push(token);
            }
        }
    }
    tokens.extend(open_tag);

    let mut doc = DocComment::default();
    let mut tokens = tokens.into_iter();
    while let Some(token) = tokens.next() {
        if token == ESCAPE_MARKER {
            if let Some(escaped) = tokens.next() {
                doc.docs.push(escaped);
            }
        } else if token.starts_with('@') {
            doc.tags.push(token);
        } else {
            doc.docs.push(token);
        }
    }
    doc
}

/// Strips comment delimiters from one line and collapses whitespace
/// control characters into spaces.
fn normalize_line(line: &str) -> String {
    let mut line = line.trim();
    if let Some(rest) = line.strip_prefix("//") {
        line = rest.trim_start_matches('/');
    } else if let Some(rest) = line.strip_prefix("/*") {
        line = rest.trim_start_matches('*');
    } else if let Some(rest) = line.strip_prefix('*') {
        if !rest.starts_with('/') {
            line = rest;
        }
    }
    if let Some(rest) = line.trim_end().strip_suffix("*/") {
        line = rest;
    }
    line.replace(['\t', '\r', '\n'], " ")
}

/// Greedily joins tokens into lines no wider than `width` columns.
///
/// A token longer than `width` occupies a line of its own.
///
/// # Examples
///
/// ```
/// use svcgen_tags::doc::wrap;
///
/// let tokens = ["one", "two", "three"];
/// assert_eq!(wrap(&tokens, 7), vec!["one two", "three"]);
/// ```
#[must_use]
pub fn wrap<S: AsRef<str>>(tokens: &[S], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for token in tokens {
        let token = token.as_ref();
        if current.is_empty() {
            current.push_str(token);
        } else if current.chars().count() + 1 + token.chars().count() <= width {
            current.push(' ');
            current.push_str(token);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(token);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Classification
    // ========================================================================

    #[test]
    fn test_escape_marker_forces_prose() {
        let doc = classify(&["@foo(1) hello ## @bar world"]);
        assert_eq!(doc.tags, vec!["@foo(1)"]);
        assert_eq!(doc.docs, vec!["hello", "@bar", "world"]);
    }

    #[test]
    fn test_escape_marker_only_affects_next_token() {
        let doc = classify(&["## @a @b"]);
        assert_eq!(doc.docs, vec!["@a"]);
        assert_eq!(doc.tags, vec!["@b"]);
    }

    #[test]
    fn test_escaped_escape_marker() {
        let doc = classify(&["## ## @tag"]);
        assert_eq!(doc.docs, vec!["##"]);
        assert_eq!(doc.tags, vec!["@tag"]);
    }

    #[test]
    fn test_trailing_escape_marker_dropped() {
        let doc = classify(&["text ##"]);
        assert_eq!(doc.docs, vec!["text"]);
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn test_tag_with_spaces_in_payload_stays_whole() {
        let doc = classify(&["// @params([a, b], (http-origin(QUERY))) Loads users."]);
        assert_eq!(doc.tags, vec!["@params([a, b], (http-origin(QUERY)))"]);
        assert_eq!(doc.docs, vec!["Loads", "users."]);
    }

    #[test]
    fn test_tag_spanning_lines() {
        let doc = classify(&["// @generate(logging,", "//   caching) done"]);
        assert_eq!(doc.tags, vec!["@generate(logging, caching)"]);
        assert_eq!(doc.docs, vec!["done"]);
    }

    #[test]
    fn test_stray_close_in_prose_keeps_later_tags() {
        let doc = classify(&["// Maps id -> name.", "// @generate(logging)"]);
        assert_eq!(doc.tags, vec!["@generate(logging)"]);
        assert_eq!(doc.docs, vec!["Maps", "id", "->", "name."]);

        let doc = classify(&["// a) first option @enable(tracing)"]);
        assert_eq!(doc.tags, vec!["@enable(tracing)"]);
        assert_eq!(doc.docs, vec!["a)", "first", "option"]);
    }

    #[test]
    fn test_open_prose_bracket_does_not_swallow_tags() {
        let doc = classify(&["// Returns (id, name", "// @disable(logging) pairs)."]);
        assert_eq!(doc.tags, vec!["@disable(logging)"]);
        assert_eq!(doc.docs, vec!["Returns", "(id,", "name", "pairs)."]);
    }

    #[test]
    fn test_early_close_in_tag_does_not_carry() {
        let doc = classify(&["// @alias(x))", "// @enable(logging)"]);
        assert_eq!(doc.tags, vec!["@alias(x))", "@enable(logging)"]);
    }

    #[test]
    fn test_unclosed_tag_at_end_is_kept() {
        let doc = classify(&["// @generate(logging,", "// caching"]);
        assert_eq!(doc.tags, vec!["@generate(logging, caching"]);
        assert!(doc.docs.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(classify(&empty), DocComment::default());
        assert_eq!(classify(&["", "//", "   "]), DocComment::default());
    }

    // ========================================================================
    // Normalization
    // ========================================================================

    #[test]
    fn test_strips_line_comment_delimiters() {
        assert_eq!(normalize_line("  // hello"), " hello");
        assert_eq!(normalize_line("/// doc"), " doc");
    }

    #[test]
    fn test_strips_block_comment_delimiters() {
        let doc = classify(&["/**", " * First line", " *\t@enable(logging)", " */"]);
        assert_eq!(doc.tags, vec!["@enable(logging)"]);
        assert_eq!(doc.docs, vec!["First", "line"]);
    }

    #[test]
    fn test_collapses_tabs() {
        let doc = classify(&["a\tb\t\tc"]);
        assert_eq!(doc.docs, vec!["a", "b", "c"]);
    }

    // ========================================================================
    // Wrapping
    // ========================================================================

    #[test]
    fn test_wrap_respects_width() {
        let tokens: Vec<String> = (0..40).map(|i| format!("word{i}")).collect();
        let lines = wrap(&tokens, DOC_WIDTH);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= DOC_WIDTH));
        assert_eq!(lines.join(" ").split(' ').count(), 40);
    }

    #[test]
    fn test_wrap_long_token_alone() {
        let long = "x".repeat(100);
        let lines = wrap(&["a", long.as_str(), "b"], 10);
        assert_eq!(lines, vec!["a".to_string(), long, "b".to_string()]);
    }

    #[test]
    fn test_wrapped_docs() {
        let doc = classify(&["// Short description."]);
        assert_eq!(doc.wrapped_docs(), vec!["Short description."]);
    }
}
