//! Nesting-aware splitting of tag payloads and comment text.
//!
//! Tag payloads nest, e.g. `@params([a, b], (http-origin(QUERY)))`, so a
//! plain `str::split` would break inside brackets. [`split`] only honors a
//! separator when every bracket pair seen so far is balanced.
//!
//! # Examples
//!
//! ```
//! use svcgen_tags::splitter::split;
//!
//! assert_eq!(split("a,(b,c),d", ","), vec!["a", "(b,c)", "d"]);
//! assert_eq!(
//!     split("[a, b], (http-origin(QUERY))", ","),
//!     vec!["[a, b]", "(http-origin(QUERY))"]
//! );
//! ```

use thiserror::Error;

/// Bracket pairs tracked by the splitter, as `(open, close)`.
pub const BRACKETS: [(char, char); 4] = [('(', ')'), ('[', ']'), ('{', '}'), ('<', '>')];

/// First bracket imbalance found in a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unbalanced {
    /// A closing bracket with no matching opener.
    #[error("unexpected '{found}' at offset {offset}")]
    UnexpectedClose {
        /// The closing bracket
        found: char,
        /// Byte offset in the input
        offset: usize,
    },

    /// An opening bracket that is never closed.
    #[error("unclosed '{open}'")]
    Unclosed {
        /// The opening bracket
        open: char,
    },
}

/// Running bracket depth over a consumed prefix.
#[derive(Debug, Default, Clone, Copy)]
struct Depth {
    counts: [i64; 4],
    broken: bool,
}

impl Depth {
    fn feed(&mut self, c: char) {
        for (i, (open, close)) in BRACKETS.iter().enumerate() {
            if c == *open {
                self.counts[i] += 1;
            } else if c == *close {
                self.counts[i] -= 1;
                if self.counts[i] < 0 {
                    // A prefix that closed too early can never balance again.
                    self.broken = true;
                }
            }
        }
    }

    fn is_balanced(&self) -> bool {
        !self.broken && self.counts.iter().all(|c| *c == 0)
    }
}

/// Splits `raw` on `sep`, ignoring separators inside brackets.
///
/// A `sep` occurrence splits only when, in the prefix consumed so far,
/// every bracket type is balanced. Parts are trimmed; empty or
/// whitespace-only parts are dropped. An empty `sep` returns the trimmed
/// input as its only part.
///
/// # Examples
///
/// ```
/// use svcgen_tags::splitter::split;
///
/// assert_eq!(split("  a  b ", " "), vec!["a", "b"]);
/// assert_eq!(split("a,,b,", ","), vec!["a", "b"]);
/// // Unbalanced prefix: the remaining separators are literal.
/// assert_eq!(split("a,(b,c", ","), vec!["a", "(b,c"]);
/// ```
#[must_use]
pub fn split(raw: &str, sep: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut push = |part: &str| {
        let part = part.trim();
        if !part.is_empty() {
            parts.push(part.to_string());
        }
    };

    if sep.is_empty() {
        push(raw);
        return parts;
    }

    let mut depth = Depth::default();
    let mut start = 0;
    let mut skip_until = 0;

    for (i, c) in raw.char_indices() {
        if i < skip_until {
            continue;
        }
        if depth.is_balanced() && raw[i..].starts_with(sep) {
            push(&raw[start..i]);
            start = i + sep.len();
            skip_until = start;
            continue;
        }
        depth.feed(c);
    }
    push(&raw[start..]);
    parts
}

/// Checks that every bracket in `raw` is closed in order.
///
/// # Errors
///
/// Returns the first [`Unbalanced`] condition: either a closing bracket
/// without an opener, or an opener left unclosed at the end.
///
/// # Examples
///
/// ```
/// use svcgen_tags::splitter::{check_balanced, Unbalanced};
///
/// assert!(check_balanced("([a], {b})").is_ok());
/// assert_eq!(check_balanced("(a"), Err(Unbalanced::Unclosed { open: '(' }));
/// ```
pub fn check_balanced(raw: &str) -> Result<(), Unbalanced> {
    let mut depth = Depth::default();
    for (offset, c) in raw.char_indices() {
        depth.feed(c);
        if depth.broken {
            return Err(Unbalanced::UnexpectedClose { found: c, offset });
        }
    }
    for (i, (open, _)) in BRACKETS.iter().enumerate() {
        if depth.counts[i] != 0 {
            return Err(Unbalanced::Unclosed { open: *open });
        }
    }
    Ok(())
}
