//! Loading translation packages from disk
//!
//! A packages directory holds one sub-directory per package and one file
//! per locale inside it:
//!
//! ```text
//! packages/
//!   ui/
//!     en.json        raw templates
//!     fr.yaml        raw templates
//!     en.ast.json    prebuilt parsed templates (optional)
//! ```
//!
//! In raw template files, numbers and booleans are read as their text so
//! `code: 404` is the template `"404"`. Arrays and nulls are rejected with the
//! key they sit under.

use crate::engine::ParsedCache;
use crate::error::{I18nError, I18nResult};
use crate::resolver::{ParsedCaches, StringsByLocale};
use crate::router::Router;
use crate::store::TemplateStore;
use crate::tree::Node;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Suffix of prebuilt parsed-template files.
const PREBUILT_SUFFIX: &str = ".ast.json";

/// All translation data found for one package.
#[derive(Debug, Default)]
pub struct PackageBundle {
    /// Package name, taken from the directory name
    pub name: String,
    /// Raw template stores by locale tag
    pub strings: StringsByLocale,
    /// Prebuilt parsed caches by locale tag; often empty
    pub prebuilt: ParsedCaches,
}

/// Reads packages from a directory tree
#[derive(Debug, Clone)]
pub struct PackageLoader {
    base_dir: PathBuf,
}

impl PackageLoader {
    /// Create a loader rooted at `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Get the base directory for packages
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Load every package directory under the base directory, sorted by name.
    pub fn load_all(&self) -> I18nResult<Vec<PackageBundle>> {
        if !self.base_dir.is_dir() {
            return Err(I18nError::ResourceLoad {
                path: self.base_dir.display().to_string(),
                reason: "not a directory".to_string(),
            });
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => warn!("Skipping package directory with non UTF-8 name: {:?}", name),
            }
        }
        names.sort();

        names.iter().map(|name| self.load_package(name)).collect()
    }

    /// Load a single package by directory name.
    pub fn load_package(&self, name: &str) -> I18nResult<PackageBundle> {
        let dir = self.base_dir.join(name);
        debug!("Loading package directory: {:?}", dir);

        let mut bundle = PackageBundle {
            name: name.to_string(),
            ..PackageBundle::default()
        };

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if let Some(locale) = file_name.strip_suffix(PREBUILT_SUFFIX) {
                let tree: ParsedCache = read_tree(&path, Format::Json)?;
                bundle.prebuilt.insert(locale.to_string(), tree);
                continue;
            }

            let Some((locale, extension)) = file_name.rsplit_once('.') else {
                continue;
            };
            let format = match extension {
                "json" => Format::Json,
                "yaml" | "yml" => Format::Yaml,
                _ => {
                    debug!("Ignoring non-translation file: {:?}", path);
                    continue;
                }
            };

            if bundle.strings.contains_key(locale) {
                return Err(I18nError::ResourceLoad {
                    path: path.display().to_string(),
                    reason: format!("duplicate strings for locale '{locale}'"),
                });
            }

            let tree = read_strings(&path, format)?;
            bundle
                .strings
                .insert(locale.to_string(), TemplateStore::from_tree(tree));
        }

        info!(
            "Loaded package '{}' ({} locales, {} prebuilt)",
            name,
            bundle.strings.len(),
            bundle.prebuilt.len()
        );
        Ok(bundle)
    }

    /// Load every package and register it with `router`.
    ///
    /// Returns the number of packages registered.
    pub fn register_all(&self, router: &Router) -> I18nResult<usize> {
        let bundles = self.load_all()?;
        let count = bundles.len();
        for bundle in bundles {
            router.add_package(bundle.name, bundle.strings, Some(bundle.prebuilt));
        }
        Ok(count)
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Json,
    Yaml,
}

fn load_error(path: &Path, reason: impl Into<String>) -> I18nError {
    I18nError::ResourceLoad {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

fn parse_file<T: DeserializeOwned>(path: &Path, format: Format) -> I18nResult<T> {
    let content = fs::read_to_string(path).map_err(|e| load_error(path, e.to_string()))?;
    match format {
        Format::Json => serde_json::from_str(&content).map_err(|e| load_error(path, e.to_string())),
        Format::Yaml => serde_yaml::from_str(&content).map_err(|e| load_error(path, e.to_string())),
    }
}

fn read_tree<T: DeserializeOwned>(path: &Path, format: Format) -> I18nResult<Node<T>> {
    let tree: Node<T> = parse_file(path, format)?;
    if tree.is_leaf() {
        return Err(load_error(path, "top level must be a mapping of keys"));
    }
    Ok(tree)
}

/// Reads a raw template file, keeping scalar values as text.
fn read_strings(path: &Path, format: Format) -> I18nResult<Node<String>> {
    match parse_file(path, format)? {
        Value::Object(map) => {
            let mut prefix = Vec::new();
            strings_from_map(map, &mut prefix).map_err(|reason| load_error(path, reason))
        }
        _ => Err(load_error(path, "top level must be a mapping of keys")),
    }
}

fn strings_from_map(map: serde_json::Map<String, Value>, prefix: &mut Vec<String>) -> Result<Node<String>, String> {
    let mut children = HashMap::with_capacity(map.len());

    for (key, value) in map {
        prefix.push(key.clone());
        let child = match value {
            Value::Object(inner) => strings_from_map(inner, prefix)?,
            Value::String(text) => Node::Leaf(text),
            Value::Number(number) => Node::Leaf(number.to_string()),
            Value::Bool(flag) => Node::Leaf(flag.to_string()),
            Value::Null | Value::Array(_) => {
                return Err(format!("unsupported value at '{}': expected a string or a mapping", prefix.join(".")));
            }
        };
        prefix.pop();
        children.insert(key, child);
    }

    Ok(Node::Interior(children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use crate::params::Params;
    use crate::syntax::{MessageParser, TemplateParser};
    use std::sync::Arc;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_load_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ui/en.json", r#"{"menu": {"open": "Open"}}"#);
        write(dir.path(), "ui/fr.yml", "menu:\n  open: Ouvrir\n");
        write(dir.path(), "ui/README.md", "not a translation");

        let bundle = PackageLoader::new(dir.path()).load_package("ui").unwrap();
        assert_eq!(bundle.strings.len(), 2);
        assert!(bundle.prebuilt.is_empty());
        assert_eq!(bundle.strings["fr"].len(), 1);
    }

    #[test]
    fn test_scalar_values_become_text() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ui/en.yaml", "greeting: Hello\ncode: 404\nlimits:\n  ratio: 0.5\n");
        write(dir.path(), "ui/fr.json", r#"{"enabled": true, "greeting": "Bonjour"}"#);

        let router = Router::new(["fr", "en"]).unwrap();
        PackageLoader::new(dir.path()).register_all(&router).unwrap();

        assert_eq!(router.resolve("ui.code", &Params::new()).unwrap(), "404");
        assert_eq!(router.resolve("ui.limits.ratio", &Params::new()).unwrap(), "0.5");
        assert_eq!(router.resolve("ui.enabled", &Params::new()).unwrap(), "true");
        assert_eq!(router.resolve("ui.greeting", &Params::new()).unwrap(), "Bonjour");
    }

    #[test]
    fn test_unsupported_value_names_its_key() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ui/en.yaml", "menu:\n  items:\n    - Open\n    - Close\n");

        let err = PackageLoader::new(dir.path()).load_package("ui").unwrap_err();
        assert!(matches!(
            err,
            I18nError::ResourceLoad { ref reason, .. } if reason.contains("'menu.items'")
        ));
    }

    #[test]
    fn test_load_prebuilt() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree: ParsedCache = Node::interior();
        tree.insert(&["hello"], Arc::new(MessageParser.parse("Hi {name}").unwrap()))
            .unwrap();
        write(dir.path(), "app/en.ast.json", &serde_json::to_string(&tree).unwrap());

        let bundle = PackageLoader::new(dir.path()).load_package("app").unwrap();
        assert_eq!(bundle.prebuilt.get("en"), Some(&tree));
        assert!(bundle.strings.is_empty());
    }

    #[test]
    fn test_scalar_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ui/en.json", r#""just a string""#);

        let err = PackageLoader::new(dir.path()).load_package("ui").unwrap_err();
        assert!(matches!(err, I18nError::ResourceLoad { .. }));
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ui/en.json", "{ not json");

        let err = PackageLoader::new(dir.path()).load_all().unwrap_err();
        assert!(matches!(err, I18nError::ResourceLoad { path, .. } if path.ends_with("en.json")));
    }

    #[test]
    fn test_missing_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let loader = PackageLoader::new(dir.path().join("nope"));
        assert!(matches!(loader.load_all(), Err(I18nError::ResourceLoad { .. })));
    }

    #[test]
    fn test_register_all() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ui/en.json", r#"{"greeting": "Hello, {name}!"}"#);
        write(dir.path(), "admin/en.yaml", "title: Admin\n");

        let router = Router::new(["en"]).unwrap();
        let count = PackageLoader::new(dir.path()).register_all(&router).unwrap();

        assert_eq!(count, 2);
        assert_eq!(router.package_names(), ["admin", "ui"]);
        assert_eq!(
            router.resolve("ui.greeting", &params! { "name" => "Sam" }).unwrap(),
            "Hello, Sam!"
        );
    }
}
