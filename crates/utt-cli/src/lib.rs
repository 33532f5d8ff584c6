//! utt CLI library.
//!
//! This crate provides the command-line interface: argument parsing,
//! configuration, and the commands that append entries and render reports.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{Config, DEFAULT_CURRENT_ACTIVITY_NAME, Zone};
