//! Marathon - Swift script resolver
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use marathon::cli::{Cli, Commands};
use marathon::config::{Config, ConfigManager};
use marathon::error::MarathonResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> MarathonResult<()> {
    let cli = Cli::parse();

    // Completions need neither logging nor config
    if let Commands::Completions(args) = cli.command {
        marathon::cli::commands::completions(args);
        return Ok(());
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);
    debug!("Using config {}", config_manager.path().display());

    let root = ConfigManager::root_dir(&config, cli.path.as_deref());
    debug!("Using root {}", root.display());
    marathon::ui::init_theme();

    match cli.command {
        Commands::Completions(_) => Ok(()),
        Commands::Resolve(args) => marathon::cli::commands::resolve(args, &config, &root).await,
        Commands::List(args) => marathon::cli::commands::list(args, &root).await,
        Commands::Remove(args) => marathon::cli::commands::remove(args, &root).await,
        Commands::Config(args) => {
            marathon::cli::commands::config(args, &config_manager, &config, &root).await
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("marathon=warn"),
        1 => EnvFilter::new("marathon=info"),
        _ => EnvFilter::new("marathon=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time();

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
