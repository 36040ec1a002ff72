//! Main entry point for the `lexicon` command.

use clap::Parser;
use lexicon_cli::{execute, load_config, Cli, CliResult, Command};
use lexicon_common::init_logging;
use lexicon_config::Config;
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            // Config errors happen before a subscriber exists, so not a log event
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> CliResult<String> {
    // init-config must work even when the existing configuration is broken
    let config = match cli.command {
        Command::InitConfig { .. } => Config::default(),
        Command::Resolve { .. } => load_config(cli).await?,
    };

    init_logging(&config.logging.filter, config.logging.format)?;
    debug!("Effective configuration: {:?}", config);

    execute(cli, &config).await
}
