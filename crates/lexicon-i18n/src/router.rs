//! Package dispatch and the top-level lookup API

use crate::engine::Backend;
use crate::error::I18nResult;
use crate::fallback::diagnostic;
use crate::key::KeyPath;
use crate::locale::Locale;
use crate::params::Params;
use crate::resolver::{LocaleResolver, ParsedCaches, StringsByLocale};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Routes `package.key.path` lookups to the package's locale resolver.
///
/// The router owns the locale priority list and the package registry; there
/// is no global state, so independent routers can coexist in one process.
#[derive(Debug)]
pub struct Router {
    locales: Vec<Locale>,
    backend: Backend,
    packages: DashMap<String, Arc<LocaleResolver>>,
}

impl Router {
    /// Create a router using the default parser and Fluent-backed compiler.
    pub fn new<I, S>(locales: I) -> I18nResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_backend(locales, Backend::default())
    }

    /// Create a router with a custom parser/compiler pair.
    pub fn with_backend<I, S>(locales: I, backend: Backend) -> I18nResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let locales = Locale::parse_all(locales)?;
        info!(
            "Router initialized with locales: {:?}",
            locales.iter().map(Locale::tag).collect::<Vec<_>>()
        );

        Ok(Self {
            locales,
            backend,
            packages: DashMap::new(),
        })
    }

    /// Locale priority list, most preferred first
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    /// Register (or replace) a package.
    ///
    /// Replacing a package discards its caches along with its old resolver.
    pub fn add_package(&self, name: impl Into<String>, strings: StringsByLocale, prebuilt: Option<ParsedCaches>) {
        let name = name.into();
        let resolver = LocaleResolver::new(&name, &self.locales, strings, prebuilt.unwrap_or_default(), &self.backend);

        if self.packages.insert(name.clone(), Arc::new(resolver)).is_some() {
            info!("Replaced package '{}'", name);
        } else {
            info!("Registered package '{}'", name);
        }
    }

    /// Whether a package named `name` is registered
    pub fn has_package(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// The resolver registered under `name`
    pub fn package(&self, name: &str) -> Option<Arc<LocaleResolver>> {
        self.packages.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Registered package names, sorted
    pub fn package_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.packages.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    /// Render `key`, falling back to a diagnostic string when no locale of
    /// the addressed package has a template for it.
    ///
    /// Fails only for keys containing the reserved segment and for templates
    /// that do not parse or compile.
    pub fn resolve(&self, key: &str, params: &Params) -> I18nResult<String> {
        match self.lookup(key, params)? {
            Some(text) => Ok(text),
            None => {
                warn!("No translation for '{}', using diagnostic fallback", key);
                Ok(diagnostic(key, params))
            }
        }
    }

    /// Like [`resolve`](Self::resolve), but a miss is `None`.
    pub fn lookup(&self, key: &str, params: &Params) -> I18nResult<Option<String>> {
        let path = KeyPath::parse(key)?;

        let Some((package, rest)) = path.split_package() else {
            debug!("Key '{}' has no package prefix", key);
            return Ok(None);
        };

        // Clone the Arc out so no registry shard lock is held while rendering
        let Some(resolver) = self.package(package) else {
            debug!("Unknown package '{}' for key '{}'", package, key);
            return Ok(None);
        };

        resolver.resolve(&rest, params)
    }
}
