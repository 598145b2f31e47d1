use anyhow::{Context, Result};
use clap::Parser;

mod cli;
mod commands;

use cli::{Args, Commands, ConfigCommands};
use commands::utils::{AppContext, init_logging};
use course_selection::config::ClientConfig;
use course_selection::platform;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let data_dir = platform::data_dir(args.home.as_deref())?;
    let config_path = ClientConfig::path_in(&data_dir);

    // A broken config file must not block rewriting it
    let rewriting = matches!(
        args.command,
        Commands::Config { command: ConfigCommands::Init { force: true, .. } }
    );
    let mut config = match ClientConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) if rewriting => {
            eprintln!("Warning: ignoring unreadable config: {:#}", e);
            ClientConfig::default()
        }
        Err(e) => return Err(e),
    };

    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
        config.validate().context("Invalid --api-url")?;
    }

    init_logging(args.verbose, &config.logging.level);
    tracing::debug!("Data directory: {}", data_dir.display());

    let ctx = AppContext {
        data_dir,
        config_path,
        config,
    };

    commands::run_command(args.command, &ctx)
}
