// ABOUTME: Entry point for the arsweep CLI application.
// ABOUTME: Parses arguments, loads configuration, and dispatches to command handlers.

mod cli;
mod commands;

use arsweep::config::{self, Config};
use arsweep::error::Result;
use arsweep::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise the verbose flag picks the level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn,arsweep=info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Some(Commands::Init {
            project,
            repository,
            force,
        }) => {
            config::init_config(&cwd, project.as_deref(), repository.as_deref(), force)?;
            Output::new(mode).progress(&format!("Wrote {}", config::CONFIG_FILENAME));
            Ok(())
        }
        None => {
            let config = Config::resolve(cli.config.as_deref(), &cwd)?
                .with_overrides(&cli.sweep.overrides());
            commands::sweep(config, Output::new(mode)).await
        }
    }
}
