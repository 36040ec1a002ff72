//! Command line argument definitions using clap.
//!
//! ## Commands
//!
//! - `resolve`: render one message key with the configured locales
//! - `init-config`: write a default configuration file

use crate::error::CliError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "lexicon", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(short, long, global = true, env = "LEXICON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Locale to try, most preferred first (overrides config file)
    /// Can be specified multiple times: --locale fr --locale en
    #[arg(short, long = "locale", global = true)]
    pub locales: Vec<String>,

    /// Packages directory (overrides config file)
    #[arg(long, global = true)]
    pub packages: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a `package.key.path` message key
    Resolve {
        /// Fully qualified message key
        key: String,

        /// Message parameter as name=value; repeat for more
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Destination; the extension selects YAML, TOML or JSON
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Splits `name=value` at the first `=`. The value may be empty.
pub fn parse_param(raw: &str) -> Result<(String, String), CliError> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(CliError::InvalidParam(raw.to_string())),
    }
}
