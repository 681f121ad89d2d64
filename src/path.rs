//! Typed dotted paths used to address comments.
//!
//! A [`KeyPath`] is an ordered list of segments. Paths are compared and
//! prefixed structurally; the dotted string form only exists for display and
//! error messages. Segment names are validated when a schema is built so that
//! the line scanner in [`annotate`](crate::annotate) can always recover them
//! from the emitted text.

use std::fmt;

use crate::error::ConfigError;

/// Separator used when a path is rendered as a dotted string.
pub const SEPARATOR: char = '.';

/// A field's full nesting address.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn root() -> Self {
        KeyPath(Vec::new())
    }

    pub fn single(segment: impl Into<String>) -> Self {
        KeyPath(vec![segment.into()])
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    pub fn truncate(&mut self, depth: usize) {
        self.0.truncate(depth);
    }

    /// Return a new path with `parent` prepended.
    pub fn prefixed(&self, parent: &str) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.push(parent.to_string());
        segments.extend(self.0.iter().cloned());
        KeyPath(segments)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        KeyPath(iter.into_iter().map(Into::into).collect())
    }
}

/// Check that `key` can be used as a single path segment.
///
/// Rejects the separator itself (a key named `a.b` is indistinguishable from
/// `a` → `b`) and anything the line scanner cannot read back from a header
/// line: empty names, `:`, `#`, line breaks or other control characters, and
/// surrounding whitespace. Keys the emitter has to quote are fine as long as
/// no escape sequence is needed.
pub fn validate_segment(key: &str) -> Result<(), ConfigError> {
    let reason = if key.is_empty() {
        Some("key must not be empty")
    } else if key.contains(SEPARATOR) {
        Some("key must not contain the path separator '.'")
    } else if key.contains(':') {
        Some("key must not contain ':'")
    } else if key.contains('#') {
        Some("key must not contain '#'")
    } else if key.contains(['\n', '\r']) {
        Some("key must not contain line breaks")
    } else if key.chars().any(char::is_control) {
        Some("key must not contain control characters")
    } else if key.trim() != key {
        Some("key must not start or end with whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }),
        None => Ok(()),
    }
}
