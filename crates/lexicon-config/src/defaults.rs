//! Default values for every configuration section.

use crate::schema::{Config, I18nConfig, LoggingConfig};
use lexicon_common::LogFormat;

/// Locale used when the configuration does not name any.
pub const DEFAULT_LOCALE: &str = "en";

/// Configuration file read from the working directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "lexicon.yaml";

/// Log filter used when neither the configuration nor `RUST_LOG` set one.
pub const DEFAULT_LOG_FILTER: &str = "info";

impl Default for Config {
    fn default() -> Self {
        Self {
            i18n: I18nConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: vec![DEFAULT_LOCALE.to_string()],
            packages_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            format: LogFormat::Pretty,
        }
    }
}
