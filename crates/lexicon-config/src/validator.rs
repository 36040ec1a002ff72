//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use lexicon_common::{LexiconError, Result};
use std::collections::HashSet;
use unic_langid::LanguageIdentifier;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Config`] describing the first problem found.
    pub fn validate(config: &Config) -> Result<()> {
        config.validate()
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// Locales must be non-empty, parse as language identifiers and be
    /// unique; the log filter must not be blank.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.i18n.locales.is_empty() {
            return Err(LexiconError::config("at least one locale must be configured"));
        }

        let mut seen = HashSet::new();
        for locale in &self.i18n.locales {
            if locale.parse::<LanguageIdentifier>().is_err() {
                return Err(LexiconError::config(format!("invalid locale '{locale}'")));
            }
            if !seen.insert(locale.as_str()) {
                return Err(LexiconError::config(format!("duplicate locale '{locale}'")));
            }
        }

        if self.logging.filter.trim().is_empty() {
            return Err(LexiconError::config("log filter cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_empty_locales() {
        let mut config = Config::default();
        config.i18n.locales.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_locales() {
        let mut config = Config::default();
        config.i18n.locales = vec!["en".into(), "fr".into(), "en".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate locale 'en'"));
    }

    #[test]
    fn test_rejects_malformed_locale() {
        let mut config = Config::default();
        config.i18n.locales = vec!["not a locale".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_blank_filter() {
        let mut config = Config::default();
        config.logging.filter = "  ".into();
        assert!(config.validate().is_err());
    }
}
