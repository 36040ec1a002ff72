//! # Lexicon I18n
//!
//! Namespaced, locale-aware message resolution.
//!
//! This crate provides:
//!
//! - A [`Router`] that dispatches `package.key.path` lookups to per-package
//!   locale resolvers
//! - Locale fallback in configured priority order
//! - Lazily filled parsed-template and formatter caches per locale
//! - An ICU-style message parser and a Fluent-backed formatter compiler
//! - A diagnostic fallback string for keys with no translation
//! - Loading of packages from JSON/YAML directories
//!
//! # Example
//!
//! ```rust
//! use lexicon_i18n::{params, Router, StringsByLocale, TemplateStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let router = Router::new(["en"])?;
//!
//! let en = TemplateStore::from_entries([("greeting", "Hello, {name}!")])?;
//! router.add_package("ui", StringsByLocale::from([("en".to_string(), en)]), None);
//!
//! let message = router.resolve("ui.greeting", &params! { "name" => "Sam" })?;
//! assert_eq!(message, "Hello, Sam!");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bundle;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod key;
pub mod locale;
pub mod params;
pub mod resolver;
pub mod resource;
pub mod router;
pub mod store;
pub mod syntax;
pub mod tree;

pub use bundle::{CompileError, FluentCompiler, Formatter, FormatterCompiler};
pub use engine::{Backend, LocaleEngine, ParsedCache};
pub use error::{I18nError, I18nResult};
pub use fallback::diagnostic;
pub use key::KeyPath;
pub use locale::Locale;
pub use params::Params;
pub use resolver::{LocaleResolver, ParsedCaches, StringsByLocale};
pub use resource::{PackageBundle, PackageLoader};
pub use router::Router;
pub use store::TemplateStore;
pub use syntax::{MessageParser, ParsedTemplate, SyntaxError, TemplateParser};
pub use tree::{Lookup, Node};
