//! Configuration loading and persistence with atomic file operations.

use crate::schema::Config;
use lexicon_common::{LexiconError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the locale priority list (comma separated).
pub const ENV_LOCALES: &str = "LEXICON_LOCALES";
/// Environment variable overriding the packages directory.
pub const ENV_PACKAGES_DIR: &str = "LEXICON_PACKAGES_DIR";
/// Environment variable overriding the log filter.
pub const ENV_LOG: &str = "LEXICON_LOG";

/// On-disk configuration format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Detects the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Config`] for a missing or unknown extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(LexiconError::config(format!(
                "unsupported configuration file extension: {}",
                path.display()
            ))),
        }
    }

    /// Parses configuration text in this format.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Serialization`] when the text is malformed.
    pub fn parse(self, contents: &str) -> Result<Config> {
        match self {
            Self::Yaml => serde_yaml::from_str(contents).map_err(|e| LexiconError::Serialization(e.to_string())),
            Self::Toml => toml::from_str(contents).map_err(|e| LexiconError::Serialization(e.to_string())),
            Self::Json => serde_json::from_str(contents).map_err(|e| LexiconError::Serialization(e.to_string())),
        }
    }

    /// Serializes a configuration in this format.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Serialization`] if serialization fails.
    pub fn render(self, config: &Config) -> Result<String> {
        match self {
            Self::Yaml => serde_yaml::to_string(config).map_err(|e| LexiconError::Serialization(e.to_string())),
            Self::Toml => toml::to_string_pretty(config).map_err(|e| LexiconError::Serialization(e.to_string())),
            Self::Json => {
                serde_json::to_string_pretty(config).map_err(|e| LexiconError::Serialization(e.to_string()))
            }
        }
    }
}

/// Applies overrides from a variable lookup function.
///
/// Empty values are ignored. Split out from [`apply_env_overrides`] so the
/// override rules can be exercised without touching the process environment.
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(locales) = lookup(ENV_LOCALES).filter(|v| !v.trim().is_empty()) {
        config.i18n.locales = locales
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        debug!("Locales overridden from environment: {:?}", config.i18n.locales);
    }

    if let Some(dir) = lookup(ENV_PACKAGES_DIR).filter(|v| !v.trim().is_empty()) {
        config.i18n.packages_dir = Some(PathBuf::from(dir));
    }

    if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
        config.logging.filter = filter;
    }
}

/// Applies `LEXICON_*` environment variable overrides.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(config, |name| std::env::var(name).ok());
}

/// Configuration loader with atomic file operations.
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this loader reads from and writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads configuration from file, applies environment overrides and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, malformed files, or an invalid configuration.
    pub async fn load(&self) -> Result<Config> {
        let format = ConfigFormat::from_path(&self.path)?;
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let mut config = format.parse(&contents)?;
        apply_env_overrides(&mut config);
        config.validate()?;

        info!("Loaded configuration from {}", self.path.display());
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the default
    /// configuration (still subject to environment overrides).
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be loaded, or the result is invalid.
    pub async fn load_or_default(&self) -> Result<Config> {
        if tokio::fs::try_exists(&self.path).await? {
            return self.load().await;
        }

        debug!("No configuration at {}, using defaults", self.path.display());
        let mut config = Config::default();
        apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to file atomically.
    ///
    /// The new contents are written to a temporary file in the target
    /// directory and then renamed over the destination.
    ///
    /// # Errors
    ///
    /// Fails on serialization or I/O errors.
    pub async fn save(&self, config: &Config) -> Result<()> {
        let format = ConfigFormat::from_path(&self.path)?;
        let contents = format.render(config)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, &contents))
            .await
            .map_err(|e| LexiconError::config(format!("save task failed: {e}")))??;

        info!("Saved configuration to {}", self.path.display());
        Ok(())
    }
}

fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut file = tempfile::NamedTempFile::new_in(&dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| LexiconError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")).unwrap(), ConfigFormat::Json);
        assert!(ConfigFormat::from_path(Path::new("a.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("config")).is_err());
    }

    #[test]
    fn test_parse_partial_yaml_uses_defaults() {
        let config = ConfigFormat::Yaml.parse("i18n:\n  locales: [fr, en]\n").unwrap();
        assert_eq!(config.i18n.locales, vec!["fr", "en"]);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_LOCALES, "de, fr ,,en"),
            (ENV_PACKAGES_DIR, "/srv/strings"),
            (ENV_LOG, ""),
        ]);
        let mut config = Config::default();
        apply_overrides(&mut config, |name| vars.get(name).map(|v| (*v).to_string()));

        assert_eq!(config.i18n.locales, vec!["de", "fr", "en"]);
        assert_eq!(config.i18n.packages_dir, Some(PathBuf::from("/srv/strings")));
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_render_round_trips_toml() {
        let mut config = Config::default();
        config.i18n.locales = vec!["en-GB".into(), "en".into()];
        let text = ConfigFormat::Toml.render(&config).unwrap();
        assert_eq!(ConfigFormat::Toml.parse(&text).unwrap(), config);
    }
}
