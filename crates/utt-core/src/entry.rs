//! Entries: the append-only records a report is derived from.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Reserved entry name marking the end of a working day.
pub const END_ENTRY_NAME: &str = "end";

/// A point-in-time record in the log.
///
/// An entry marks the moment a task started; the task runs until the next
/// entry. The entry closing an interval carries that interval's comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// When the entry was recorded.
    pub timestamp: DateTime<FixedOffset>,
    /// Task name, possibly `project: task`, or [`END_ENTRY_NAME`].
    pub name: String,
    /// Reserved flag. Always `false` for entries written by `utt`.
    #[serde(default)]
    pub reserved: bool,
    /// Free-text annotation for the interval this entry closes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Entry {
    /// Creates an entry after validating the name.
    ///
    /// Surrounding whitespace is trimmed from the name; a blank comment is
    /// treated as no comment.
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        name: impl Into<String>,
        comment: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::Empty {
                field: "entry name",
            });
        }
        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Self {
            timestamp,
            name,
            reserved: false,
            comment,
        })
    }

    /// Creates the end-of-day marker entry.
    pub fn end(timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            timestamp,
            name: END_ENTRY_NAME.to_string(),
            reserved: false,
            comment: None,
        }
    }

    /// Whether this entry is the end-of-day marker.
    pub fn is_end(&self) -> bool {
        self.name == END_ENTRY_NAME
    }
}

/// Append-only sink for new entries.
///
/// Implemented by the storage layer; command handlers only ever append.
pub trait AddEntry {
    /// The error returned when the entry cannot be stored.
    type Error;

    /// Appends `entry` to the end of the log.
    fn add_entry(&mut self, entry: Entry) -> Result<(), Self::Error>;
}
