//! Option bags produced by custom tag parsers.
//!
//! A custom parser fills one [`TagOptions`] per invocation; non-empty bags
//! are merged into the entity's [`TagsOptions`] under the resolved tag
//! name. Both keep insertion order.
//!
//! # Examples
//!
//! ```
//! use svcgen_tags::options::{TagOptions, TagsOptions};
//!
//! let mut bag = TagOptions::new();
//! bag.set("ttl", "30s");
//!
//! let mut all = TagsOptions::new();
//! all.merge("cache", bag);
//! assert_eq!(all.get("cache").and_then(|o| o.get("ttl")), Some("30s"));
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key/value options from one custom tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOptions {
    entries: Vec<(String, String)>,
}

impl TagOptions {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if the bag holds no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copies every entry of `other` into `self`; later values win.
    pub fn extend(&mut self, other: Self) {
        for (k, v) in other.entries {
            self.set(k, v);
        }
    }
}

impl Serialize for TagOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Options of every custom tag attached to one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagsOptions {
    tags: Vec<(String, TagOptions)>,
}

impl TagsOptions {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `options` under `tag`.
    ///
    /// Empty bags are ignored. When the tag already has options, the new
    /// entries are merged into them.
    pub fn merge(&mut self, tag: impl Into<String>, options: TagOptions) {
        if options.is_empty() {
            return;
        }
        let tag = tag.into();
        if let Some((_, existing)) = self.tags.iter_mut().find(|(t, _)| *t == tag) {
            existing.extend(options);
        } else {
            self.tags.push((tag, options));
        }
    }

    /// Returns the options of `tag`.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&TagOptions> {
        self.tags.iter().find(|(t, _)| t == tag).map(|(_, o)| o)
    }

    /// Returns `true` if `tag` contributed options.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Returns `true` if no custom tag contributed options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates tags in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagOptions)> {
        self.tags.iter().map(|(t, o)| (t.as_str(), o))
    }
}

impl Serialize for TagsOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tags.len()))?;
        for (tag, options) in &self.tags {
            map.serialize_entry(tag, options)?;
        }
        map.end()
    }
}
