//! Wiring from command line and configuration to a ready router.

use crate::cli::{Cli, Command};
use crate::error::{CliError, CliResult};
use lexicon_config::{Config, ConfigLoader, DEFAULT_CONFIG_FILE};
use lexicon_i18n::{PackageLoader, Params, Router};
use std::path::Path;
use tracing::{info, warn};

/// Loads the configuration named on the command line, then applies command
/// line overrides and validates the result.
///
/// Without `--config`, [`DEFAULT_CONFIG_FILE`] is read if it exists and the
/// defaults are used otherwise. A named file must exist.
pub async fn load_config(cli: &Cli) -> CliResult<Config> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::new(path).load().await?,
        None => ConfigLoader::new(DEFAULT_CONFIG_FILE).load_or_default().await?,
    };

    apply_cli_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

/// Command line options take precedence over the file and the environment.
pub fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if !cli.locales.is_empty() {
        config.i18n.locales.clone_from(&cli.locales);
    }
    if let Some(dir) = &cli.packages {
        config.i18n.packages_dir = Some(dir.clone());
    }
}

/// Builds a router for the configured locales and registers every package
/// found in the packages directory.
pub fn build_router(config: &Config) -> CliResult<Router> {
    let router = Router::new(config.i18n.locales.iter().cloned())?;

    match &config.i18n.packages_dir {
        Some(dir) => {
            let count = PackageLoader::new(dir).register_all(&router)?;
            info!("Registered {} packages from {}", count, dir.display());
        }
        None => warn!("No packages directory configured; every key will use the diagnostic fallback"),
    }

    Ok(router)
}

/// Resolves `key` with `params` given as ordered `(name, value)` pairs.
pub fn resolve(router: &Router, key: &str, params: &[(String, String)]) -> CliResult<String> {
    let params: Params = params.iter().cloned().collect();
    Ok(router.resolve(key, &params)?)
}

/// Writes the default configuration to `path`.
pub async fn init_config(path: &Path, force: bool) -> CliResult<()> {
    if !force && tokio::fs::try_exists(path).await.map_err(lexicon_common::LexiconError::from)? {
        return Err(CliError::AlreadyExists(path.to_path_buf()));
    }
    ConfigLoader::new(path).save(&Config::default()).await?;
    Ok(())
}

/// Runs the selected command against an already loaded configuration and
/// returns what should be printed.
pub async fn execute(cli: &Cli, config: &Config) -> CliResult<String> {
    match &cli.command {
        Command::Resolve { key, params } => {
            let router = build_router(config)?;
            resolve(&router, key, params)
        }
        Command::InitConfig { path, force } => {
            init_config(path, *force).await?;
            Ok(format!("Wrote default configuration to {}", path.display()))
        }
    }
}
