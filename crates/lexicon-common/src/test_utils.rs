//! Test utilities and shared test helpers for Lexicon.
//!
//! These helpers are shared by the unit and integration tests of every crate
//! in the workspace.

use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        // Another test harness may already own the global subscriber.
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write `contents` to `relative` under `root`, creating parent directories.
pub fn write_fixture(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, contents).expect("Failed to write fixture");
    path
}

/// Translation fixtures used across crates.
pub mod translation_fixtures {
    /// English strings for a `ui` package as JSON.
    pub fn ui_en_json() -> &'static str {
        r#"{
  "greeting": "Hello, {name}!",
  "inbox": {
    "count": "{count, plural, =0 {No messages} one {# message} other {# messages}}"
  }
}"#
    }

    /// French strings for a `ui` package as YAML.
    pub fn ui_fr_yaml() -> &'static str {
        concat!(
            "greeting: \"Bonjour, {name} !\"\n",
            "farewell: \"Au revoir\"\n",
            "inbox:\n",
            "  count: \"{count, plural, one {# message} other {# messages}}\"\n",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_multiple_calls() {
        // Should not panic when called multiple times
        init_test_logging();
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_write_fixture_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "ui/en.json", "{}");
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }

    #[test]
    fn test_fixtures_are_valid_json() {
        let value: serde_json::Value =
            serde_json::from_str(translation_fixtures::ui_en_json()).unwrap();
        assert_eq!(value["greeting"], "Hello, {name}!");
    }
}
