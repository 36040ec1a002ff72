//! Per-locale resolution engine
//!
//! # Invariants
//!
//! 1. **Shape is fixed**: a cache position is a leaf or an interior node and
//!    never changes kind; existing entries are never overwritten or evicted.
//!
//! 2. **Formatters come from parsed templates**: a formatter leaf at a path
//!    is only ever compiled from the parsed-template leaf at the same path.
//!
//! 3. **At most once**: for a given path the parser and the compiler each
//!    run at most once per engine, and every later call reuses the same
//!    formatter instance.
//!
//! 4. **No negative caching**: a lookup that finds nothing writes nothing,
//!    so strings added to the store later are picked up by the next call.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | No string at the path | `Ok(None)` |
//! | Shape mismatch | Path runs through a string, or names a group | `Ok(None)` |
//! | Bad template | Parser rejects the raw string | `Err(TemplateSyntax)`, nothing cached |
//! | Compile failure | Compiler rejects the parsed template | `Err(Compile)`, formatter not cached |
//! | Reserved segment | Key contains `__proto__` | `Err(ReservedSegment)` |

use crate::bundle::{FluentCompiler, Formatter, FormatterCompiler};
use crate::error::{I18nError, I18nResult};
use crate::key::{self, KeyPath};
use crate::locale::Locale;
use crate::params::Params;
use crate::store::TemplateStore;
use crate::syntax::{MessageParser, ParsedTemplate, TemplateParser};
use crate::tree::{Lookup, Node};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Tree of parsed templates for one locale of one package.
pub type ParsedCache = Node<Arc<ParsedTemplate>>;

/// Tree of compiled formatters for one locale of one package.
pub type FormatterCache = Node<Arc<dyn Formatter>>;

/// The parser and compiler an engine delegates to.
#[derive(Clone)]
pub struct Backend {
    parser: Arc<dyn TemplateParser>,
    compiler: Arc<dyn FormatterCompiler>,
}

impl Backend {
    /// Pair a parser with a compiler.
    pub fn new(parser: Arc<dyn TemplateParser>, compiler: Arc<dyn FormatterCompiler>) -> Self {
        Self { parser, compiler }
    }

    /// Turns raw strings into parsed templates
    pub fn parser(&self) -> &dyn TemplateParser {
        self.parser.as_ref()
    }

    /// Turns parsed templates into formatters
    pub fn compiler(&self) -> &dyn FormatterCompiler {
        self.compiler.as_ref()
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::new(Arc::new(MessageParser), Arc::new(FluentCompiler))
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend").finish_non_exhaustive()
    }
}

struct Caches {
    parsed: ParsedCache,
    formatters: FormatterCache,
}

/// Resolves key paths for one (package, locale) pair.
///
/// Both caches sit behind one mutex that is held for the whole
/// walk-and-fill of a call, so overlapping prefixes never race.
pub struct LocaleEngine {
    package: Arc<str>,
    locale: Locale,
    store: TemplateStore,
    backend: Backend,
    caches: Mutex<Caches>,
}

impl fmt::Debug for LocaleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleEngine")
            .field("package", &self.package)
            .field("locale", &self.locale.tag())
            .field("templates", &self.store.len())
            .finish_non_exhaustive()
    }
}

impl LocaleEngine {
    /// Create an engine. `prebuilt` seeds the parsed-template cache.
    pub fn new(
        package: Arc<str>,
        locale: Locale,
        store: TemplateStore,
        prebuilt: Option<ParsedCache>,
        backend: Backend,
    ) -> Self {
        let parsed = match prebuilt {
            Some(tree @ Node::Interior(_)) => tree,
            _ => Node::interior(),
        };
        Self {
            package,
            locale,
            store,
            backend,
            caches: Mutex::new(Caches {
                parsed,
                formatters: Node::interior(),
            }),
        }
    }

    /// The locale this engine compiles for
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The store this engine reads from. Clones share its contents.
    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Number of parsed templates currently cached
    pub fn cached_templates(&self) -> usize {
        self.caches.lock().parsed.leaf_count()
    }

    /// Number of formatters currently cached
    pub fn cached_formatters(&self) -> usize {
        self.caches.lock().formatters.leaf_count()
    }

    /// Render the template at `path`, or `None` if this locale has none.
    pub fn resolve(&self, path: &KeyPath<'_>, params: &Params) -> I18nResult<Option<String>> {
        match self.formatter(path)? {
            Some(formatter) => Ok(Some(formatter.render(params))),
            None => Ok(None),
        }
    }

    /// Cached formatter at `path`, building and caching it on first use.
    pub fn formatter(&self, path: &KeyPath<'_>) -> I18nResult<Option<Arc<dyn Formatter>>> {
        if path.segments().contains(&key::RESERVED_SEGMENT) {
            return Err(I18nError::ReservedSegment {
                key: self.qualified(path),
            });
        }

        let mut guard = self.caches.lock();
        let caches = &mut *guard;
        let segments = path.segments();

        match caches.formatters.lookup(segments) {
            Lookup::Found(formatter) => {
                trace!(package = %self.package, locale = %self.locale, key = %path, "formatter cache hit");
                return Ok(Some(Arc::clone(formatter)));
            }
            Lookup::Blocked => return Ok(None),
            Lookup::Absent => {}
        }

        let Some(parsed) = self.parsed(&mut caches.parsed, path)? else {
            return Ok(None);
        };

        let formatter = self
            .backend
            .compiler()
            .compile(&parsed, &self.locale)
            .map_err(|e| I18nError::Compile {
                key: self.qualified(path),
                locale: self.locale.tag().to_string(),
                reason: e.0,
            })?;

        if caches.formatters.insert(segments, Arc::clone(&formatter)).is_err() {
            debug!(package = %self.package, locale = %self.locale, key = %path, "formatter not cached: shape conflict");
        } else {
            debug!(package = %self.package, locale = %self.locale, key = %path, "compiled formatter");
        }

        Ok(Some(formatter))
    }

    fn parsed(&self, tree: &mut ParsedCache, path: &KeyPath<'_>) -> I18nResult<Option<Arc<ParsedTemplate>>> {
        let segments = path.segments();

        match tree.lookup(segments) {
            Lookup::Found(parsed) => return Ok(Some(Arc::clone(parsed))),
            Lookup::Blocked => return Ok(None),
            Lookup::Absent => {}
        }

        let Some(source) = self.store.get(path) else {
            return Ok(None);
        };

        let parsed = self
            .backend
            .parser()
            .parse(&source)
            .map(Arc::new)
            .map_err(|source| I18nError::TemplateSyntax {
                key: self.qualified(path),
                locale: self.locale.tag().to_string(),
                source,
            })?;

        if tree.insert(segments, Arc::clone(&parsed)).is_err() {
            debug!(package = %self.package, locale = %self.locale, key = %path, "parsed template not cached: shape conflict");
        } else {
            debug!(package = %self.package, locale = %self.locale, key = %path, "parsed template");
        }

        Ok(Some(parsed))
    }

    fn qualified(&self, path: &KeyPath<'_>) -> String {
        format!("{}{}{}", self.package, key::SEPARATOR, path)
    }
}
