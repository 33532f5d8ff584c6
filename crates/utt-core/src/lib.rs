//! Core domain logic for utt.
//!
//! This crate contains the value types and the pure pipeline that turns an
//! entry log into report activities:
//! - Entries: timestamped start/stop markers appended by the user
//! - Activities: intervals derived from adjacent entries
//! - Names: the `project: task` naming convention
//! - Clock and timezone capabilities, passed in explicitly

mod activities;
mod activity;
mod clock;
mod entry;
mod name;
mod report;
mod types;

pub use activities::{
    activities, clip_to_window, current_activity, filter_by_project, pair_entries,
    remove_end_activities,
};
pub use activity::Activity;
pub use clock::{LocalTimezone, Now, SystemClock};
pub use entry::{AddEntry, END_ENTRY_NAME, Entry};
pub use name::Name;
pub use report::{DateRange, ReportArgs, ReportWindow};
pub use types::ValidationError;
