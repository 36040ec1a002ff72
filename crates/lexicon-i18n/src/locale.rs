//! Locale identifiers

use crate::error::{I18nError, I18nResult};
use std::fmt;
use unic_langid::LanguageIdentifier;

/// A configured locale: the tag as written by the caller plus its parsed
/// language identifier.
///
/// The tag is kept verbatim because translation data is keyed by it; the
/// identifier is what formatters use for plural rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    tag: String,
    id: LanguageIdentifier,
}

impl Locale {
    /// Parse a locale tag such as `en`, `fr-CA` or `pt_BR`.
    pub fn parse(tag: impl Into<String>) -> I18nResult<Self> {
        let tag = tag.into();
        let id = tag
            .parse::<LanguageIdentifier>()
            .map_err(|_| I18nError::InvalidLanguageId(tag.clone()))?;
        Ok(Self { tag, id })
    }

    /// The tag exactly as configured
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The parsed language identifier
    pub fn language_identifier(&self) -> &LanguageIdentifier {
        &self.id
    }

    /// Parse an ordered list of tags, preserving order
    pub fn parse_all<I, S>(tags: I) -> I18nResult<Vec<Self>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tags.into_iter().map(Self::parse).collect()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}
