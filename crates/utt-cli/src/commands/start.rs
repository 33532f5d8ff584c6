//! Start command: log the task you are switching to.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use utt_core::{AddEntry, Entry, Now};

use crate::Zone;
use crate::commands::util::parse_timestamp;

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Task description, optionally `project: task`.
    pub name: String,

    /// Comment/annotation for the task entry.
    #[arg(short, long)]
    pub comment: Option<String>,

    /// When the task started: RFC 3339, HH:MM, or e.g. '10 minutes ago'. Defaults to now.
    #[arg(long)]
    pub at: Option<String>,
}

pub fn run<W, S, N>(writer: &mut W, args: &StartArgs, log: &mut S, clock: &N, zone: Zone) -> Result<()>
where
    W: Write,
    S: AddEntry,
    S::Error: std::error::Error + Send + Sync + 'static,
    N: Now + ?Sized,
{
    let now = zone.convert(clock.now());
    let timestamp = match args.at.as_deref() {
        Some(at) => parse_timestamp(at, now, &zone)?,
        None => now,
    };

    let entry = Entry::new(timestamp, args.name.as_str(), args.comment.clone())?;
    let message = format!(
        "Started {} at {}",
        entry.name,
        entry.timestamp.format("%Y-%m-%d %H:%M")
    );
    log.add_entry(entry).context("failed to append entry")?;

    writeln!(writer, "{message}")?;
    Ok(())
}
