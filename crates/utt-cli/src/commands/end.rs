//! End command: mark the end of the working day.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use utt_core::{AddEntry, END_ENTRY_NAME, Entry, Now};

use crate::Zone;
use crate::commands::util::parse_timestamp;

#[derive(Debug, Args)]
pub struct EndArgs {
    /// When the day ended: RFC 3339, HH:MM, or e.g. '10 minutes ago'. Defaults to now.
    #[arg(long)]
    pub at: Option<String>,
}

pub fn run<W, S, N>(writer: &mut W, args: &EndArgs, log: &mut S, clock: &N, zone: Zone) -> Result<()>
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

    log.add_entry(Entry::end(timestamp))
        .context("failed to append entry")?;

    writeln!(
        writer,
        "Said '{END_ENTRY_NAME}' at {}",
        timestamp.format("%Y-%m-%d %H:%M")
    )?;
    Ok(())
}
