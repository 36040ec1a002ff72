//! Application-wide error types using thiserror.

use lexicon_common::LexiconError;
use lexicon_i18n::I18nError;
use std::path::PathBuf;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Configuration or logging error.
    #[error("Configuration error: {0}")]
    Config(#[from] LexiconError),

    /// Translation loading or resolution error.
    #[error("Translation error: {0}")]
    I18n(#[from] I18nError),

    /// A `-p` argument not of the form `name=value`.
    #[error("Invalid parameter '{0}': expected name=value")]
    InvalidParam(String),

    /// Refused to overwrite an existing file.
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),
}

/// Result type for the command line application.
pub type CliResult<T> = Result<T, CliError>;
