//! Storage layer for utt.
//!
//! Persists the entry log using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! ## Ordering
//!
//! The log is append-only. Entries are read back in insertion order (the
//! `id` column), never re-sorted by timestamp. Appends that would go back in
//! time are rejected so insertion order stays chronological.
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 format with the offset they were
//! recorded in (e.g., `2025-01-29T09:00:00+01:00`), so a report rendered later
//! shows the wall-clock time the user saw when logging.

use std::path::Path;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;
use utt_core::{AddEntry, Entry};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored entry timestamp.
    #[error("invalid timestamp for entry {entry_id}: {timestamp}")]
    TimestampParse {
        entry_id: i64,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// The new entry would precede the current last entry.
    #[error("entry at {timestamp} is earlier than the last entry at {last}")]
    OutOfOrder {
        timestamp: DateTime<FixedOffset>,
        last: DateTime<FixedOffset>,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- Entries table: the append-only log
            -- timestamp: RFC 3339 with offset (e.g., '2025-01-29T09:00:00+01:00')
            -- reserved: unused flag, always 0 for entries written by utt
            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                name TEXT NOT NULL,
                comment TEXT,
                reserved INTEGER NOT NULL DEFAULT 0
            );
            ",
        )?;
        Ok(())
    }

    /// Appends an entry to the log.
    ///
    /// Fails with [`DbError::OutOfOrder`] if the entry is earlier than the
    /// current last entry.
    pub fn append_entry(&mut self, entry: &Entry) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        {
            if let Some(last) = query_last_entry(&tx)? {
                if entry.timestamp < last.timestamp {
                    return Err(DbError::OutOfOrder {
                        timestamp: entry.timestamp,
                        last: last.timestamp,
                    });
                }
            }

            tx.execute(
                "INSERT INTO entries (timestamp, name, comment, reserved) VALUES (?, ?, ?, ?)",
                params![
                    format_timestamp(entry.timestamp),
                    entry.name,
                    entry.comment,
                    entry.reserved,
                ],
            )?;
        }
        tx.commit()?;
        tracing::debug!(name = %entry.name, timestamp = %entry.timestamp, "appended entry");
        Ok(())
    }

    /// Lists all entries in the order they were appended.
    pub fn list_entries(&self) -> Result<Vec<Entry>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, timestamp, name, comment, reserved
            FROM entries
            ORDER BY id ASC
            ",
        )?;
        let rows = stmt.query_map([], raw_entry)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.into_entry()?);
        }
        Ok(entries)
    }

    /// Returns the most recently appended entry.
    pub fn last_entry(&self) -> Result<Option<Entry>, DbError> {
        query_last_entry(&self.conn)
    }

    /// Number of entries in the log.
    pub fn entry_count(&self) -> Result<usize, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

impl AddEntry for Database {
    type Error = DbError;

    fn add_entry(&mut self, entry: Entry) -> Result<(), Self::Error> {
        self.append_entry(&entry)
    }
}

fn query_last_entry(conn: &Connection) -> Result<Option<Entry>, DbError> {
    conn.query_row(
        "SELECT id, timestamp, name, comment, reserved FROM entries ORDER BY id DESC LIMIT 1",
        [],
        raw_entry,
    )
    .optional()?
    .map(RawEntry::into_entry)
    .transpose()
}

/// An entry row before timestamp parsing.
struct RawEntry {
    id: i64,
    timestamp: String,
    name: String,
    comment: Option<String>,
    reserved: bool,
}

impl RawEntry {
    fn into_entry(self) -> Result<Entry, DbError> {
        let timestamp = parse_timestamp(&self.timestamp, self.id)?;
        Ok(Entry {
            timestamp,
            name: self.name,
            reserved: self.reserved,
            comment: self.comment,
        })
    }
}

fn raw_entry(row: &Row<'_>) -> rusqlite::Result<RawEntry> {
    Ok(RawEntry {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        name: row.get(2)?,
        comment: row.get(3)?,
        reserved: row.get(4)?,
    })
}

fn parse_timestamp(timestamp: &str, entry_id: i64) -> Result<DateTime<FixedOffset>, DbError> {
    DateTime::parse_from_rfc3339(timestamp).map_err(|source| DbError::TimestampParse {
        entry_id,
        timestamp: timestamp.to_string(),
        source,
    })
}

fn format_timestamp(timestamp: DateTime<FixedOffset>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
