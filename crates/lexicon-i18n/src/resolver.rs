//! Locale fallback for one package

use crate::engine::{Backend, LocaleEngine, ParsedCache};
use crate::error::I18nResult;
use crate::key::KeyPath;
use crate::locale::Locale;
use crate::params::Params;
use crate::store::TemplateStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Raw strings of one package, keyed by locale tag.
pub type StringsByLocale = HashMap<String, TemplateStore>;

/// Prebuilt parsed-template caches of one package, keyed by locale tag.
pub type ParsedCaches = HashMap<String, ParsedCache>;

/// Tries each configured locale in priority order.
#[derive(Debug)]
pub struct LocaleResolver {
    package: Arc<str>,
    engines: Vec<LocaleEngine>,
}

impl LocaleResolver {
    /// One engine per entry of `locales`, in the same order.
    ///
    /// Locales the package has no strings for still get an engine with an
    /// empty store. Strings for locales outside `locales` are ignored.
    pub fn new(
        package: &str,
        locales: &[Locale],
        mut strings: StringsByLocale,
        mut prebuilt: ParsedCaches,
        backend: &Backend,
    ) -> Self {
        let package: Arc<str> = Arc::from(package);

        let engines = locales
            .iter()
            .map(|locale| {
                let store = strings.remove(locale.tag()).unwrap_or_default();
                let parsed = prebuilt.remove(locale.tag());
                LocaleEngine::new(Arc::clone(&package), locale.clone(), store, parsed, backend.clone())
            })
            .collect();

        for tag in strings.keys().chain(prebuilt.keys()) {
            debug!("Package '{}' has strings for unconfigured locale '{}'", package, tag);
        }

        Self { package, engines }
    }

    /// Name the package was registered under
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The engine for `tag`, if that locale is configured.
    pub fn engine(&self, tag: &str) -> Option<&LocaleEngine> {
        self.engines.iter().find(|engine| engine.locale().tag() == tag)
    }

    /// One engine per configured locale, in priority order
    pub fn engines(&self) -> &[LocaleEngine] {
        &self.engines
    }

    /// First rendering produced by a locale, in priority order.
    ///
    /// An empty rendering counts as a result. Errors stop the search.
    pub fn resolve(&self, path: &KeyPath<'_>, params: &Params) -> I18nResult<Option<String>> {
        for engine in &self.engines {
            if let Some(text) = engine.resolve(path, params)? {
                trace!(package = %self.package, locale = %engine.locale(), key = %path, "resolved");
                return Ok(Some(text));
            }
        }
        Ok(None)
    }
}
