//! Common type definitions shared across the workspace.

/// Common result type for the application.
pub type Result<T> = std::result::Result<T, LexiconError>;

/// Application-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum LexiconError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LexiconError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
