//! vlsitech - technology plugin inspector
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vlsitech::cli::{Cli, Commands, TechContext};
use vlsitech::config::ConfigManager;
use vlsitech::error::TechResult;

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

async fn run() -> TechResult<()> {
    let cli = Cli::parse();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("vlsitech=warn"),
        1 => EnvFilter::new("vlsitech=info"),
        _ => EnvFilter::new("vlsitech=debug"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time();
    if config.general.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
    debug!("Using config {}", config_manager.path().display());

    // Config command doesn't need a technology
    if let Commands::Config(args) = cli.command {
        return vlsitech::cli::commands::config(args, &config, &config_manager).await;
    }

    let ctx = TechContext::load(&cli, &config).await?;

    match cli.command {
        Commands::Config(_) => unreachable!("Config handled above"),
        Commands::Resolve(args) => vlsitech::cli::commands::resolve(args, &ctx).await,
        Commands::Extract => vlsitech::cli::commands::extract(&ctx).await,
        Commands::Check => vlsitech::cli::commands::check(&ctx).await,
        Commands::Libraries(args) => vlsitech::cli::commands::libraries(args, &ctx).await,
    }
}
