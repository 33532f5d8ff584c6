//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::end::EndArgs;
use crate::commands::log::LogArgs;
use crate::commands::report::ReportCommand;
use crate::commands::start::StartArgs;

/// A simple command-line time tracker.
///
/// Log what you start working on; `utt report` turns the log into a
/// timesheet.
#[derive(Debug, Parser)]
#[command(name = "utt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a new task.
    Start(StartArgs),

    /// Say 'end' when you're done for the day.
    End(EndArgs),

    /// Print the entry log.
    Log(LogArgs),

    /// Show activities for a day, a week or a date range.
    Report(ReportCommand),
}
