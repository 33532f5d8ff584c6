//! Log command: print the raw entry log.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use utt_db::Database;

use crate::Zone;

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Output entries as JSON lines.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &LogArgs, db: &Database, zone: Zone) -> Result<()> {
    let entries = db.list_entries().context("failed to read entry log")?;

    if entries.is_empty() && !args.json {
        writeln!(writer, "No entries recorded.")?;
        return Ok(());
    }

    for entry in entries {
        if args.json {
            let json = serde_json::to_string(&entry)?;
            writeln!(writer, "{json}")?;
            continue;
        }

        let timestamp = zone.convert(entry.timestamp);
        write!(writer, "{} {}", timestamp.format("%Y-%m-%d %H:%M"), entry.name)?;
        if let Some(comment) = &entry.comment {
            write!(writer, "  [{comment}]")?;
        }
        writeln!(writer)?;
    }

    Ok(())
}
