use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use utt_cli::commands::{end, log, report, start};
use utt_cli::{Cli, Commands, Config};
use utt_core::SystemClock;

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(utt_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = utt_db::Database::open(&config.database_path).context("failed to open database")?;
    tracing::debug!(
        path = %config.database_path.display(),
        entries = db.entry_count()?,
        "opened database"
    );
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Start(args)) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            start::run(&mut stdout, args, &mut db, &SystemClock, config.zone()?)?;
        }
        Some(Commands::End(args)) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            end::run(&mut stdout, args, &mut db, &SystemClock, config.zone()?)?;
        }
        Some(Commands::Log(args)) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            log::run(&mut stdout, args, &db, config.zone()?)?;
        }
        Some(Commands::Report(args)) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            report::run(&mut stdout, args, &config, &db, &SystemClock)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
