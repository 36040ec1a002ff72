//! Error types for message resolution

use crate::syntax::SyntaxError;
use thiserror::Error;

/// Errors that can occur while registering or resolving messages.
///
/// A key that simply has no translation is not an error; it resolves to
/// `None` internally and to the diagnostic fallback at the router.
#[derive(Error, Debug)]
pub enum I18nError {
    /// A lookup key contained the reserved inheritance segment
    #[error("Key '{key}' contains the reserved segment '{segment}'", segment = crate::key::RESERVED_SEGMENT)]
    ReservedSegment {
        /// The full key as requested
        key: String,
    },

    /// A raw template could not be parsed
    #[error("Invalid template at '{key}' for locale {locale}: {source}")]
    TemplateSyntax {
        /// Fully qualified key of the template
        key: String,
        /// Locale tag whose string failed
        locale: String,
        /// Where and why parsing stopped
        #[source]
        source: SyntaxError,
    },

    /// A parsed template could not be compiled into a formatter
    #[error("Failed to compile '{key}' for locale {locale}: {reason}")]
    Compile {
        /// Fully qualified key of the template
        key: String,
        /// Locale tag the formatter was built for
        locale: String,
        /// Compiler's explanation
        reason: String,
    },

    /// Failed to parse a language identifier
    #[error("Invalid language identifier: {0}")]
    InvalidLanguageId(String),

    /// Inserting into a template store would turn a string into a group or
    /// a group into a string
    #[error("Key '{key}' conflicts with the existing shape of the template tree")]
    ShapeConflict {
        /// The dotted key being inserted
        key: String,
    },

    /// Failed to load a resource file
    #[error("Failed to load resource file {path}: {reason}")]
    ResourceLoad {
        /// File or directory that failed
        path: String,
        /// Underlying problem
        reason: String,
    },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;
