//! Dotted key paths and the reserved-segment guard

use crate::error::{I18nError, I18nResult};
use std::fmt;

/// Separator between key path segments.
pub const SEPARATOR: char = '.';

/// Segment that may never appear in a lookup key.
///
/// Translation data is routinely shared with JavaScript tooling, where this
/// segment addresses the object prototype. Keys carrying it are treated as
/// hostile input.
pub const RESERVED_SEGMENT: &str = "__proto__";

/// Rejects `key` if any of its segments is [`RESERVED_SEGMENT`].
pub fn guard(key: &str) -> I18nResult<()> {
    if key.split(SEPARATOR).any(|segment| segment == RESERVED_SEGMENT) {
        return Err(I18nError::ReservedSegment {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// A validated, dot-split key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath<'a> {
    segments: Vec<&'a str>,
}

impl<'a> KeyPath<'a> {
    /// Split `key` on `.` after checking it with [`guard`].
    pub fn parse(key: &'a str) -> I18nResult<Self> {
        guard(key)?;
        Ok(Self {
            segments: key.split(SEPARATOR).collect(),
        })
    }

    /// Builds a path from segments that already passed the guard.
    fn from_segments(segments: Vec<&'a str>) -> Self {
        Self { segments }
    }

    /// The segments, in order
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Splits off the first segment (the package name).
    ///
    /// Returns `None` for single-segment keys, which name no template.
    pub fn split_package(&self) -> Option<(&'a str, KeyPath<'a>)> {
        match self.segments.split_first() {
            Some((package, rest)) if !rest.is_empty() => {
                Some((*package, KeyPath::from_segments(rest.to_vec())))
            }
            _ => None,
        }
    }
}

impl fmt::Display for KeyPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_dots() {
        let path = KeyPath::parse("ui.menu.open").unwrap();
        assert_eq!(path.segments(), ["ui", "menu", "open"]);
        assert_eq!(path.to_string(), "ui.menu.open");
    }

    #[test]
    fn test_guard_rejects_reserved_segment_anywhere() {
        for key in ["__proto__", "__proto__.x", "ui.__proto__", "a.__proto__.b"] {
            assert!(
                matches!(KeyPath::parse(key), Err(I18nError::ReservedSegment { .. })),
                "{key} should be rejected"
            );
        }
    }

    #[test]
    fn test_guard_allows_lookalikes() {
        assert!(guard("ui.__proto").is_ok());
        assert!(guard("ui.proto__.x").is_ok());
        assert!(guard("ui.__proto__x").is_ok());
    }

    #[test]
    fn test_split_package() {
        let path = KeyPath::parse("ui.greeting.short").unwrap();
        let (package, rest) = path.split_package().unwrap();
        assert_eq!(package, "ui");
        assert_eq!(rest.to_string(), "greeting.short");

        assert!(KeyPath::parse("ui").unwrap().split_package().is_none());
    }
}
