//! Activities: intervals of time spent on one task.

use chrono::{DateTime, Duration, FixedOffset};

use crate::name::Name;

/// A derived interval of work.
///
/// Activities are computed fresh for each report and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub name: Name,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// Set only on the synthesized, still-running activity.
    pub is_current: bool,
    pub comment: Option<String>,
}

impl Activity {
    pub const fn new(
        name: Name,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        is_current: bool,
        comment: Option<String>,
    ) -> Self {
        Self {
            name,
            start,
            end,
            is_current,
            comment,
        }
    }

    /// Time between start and end. Negative for an inverted interval.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// An activity with no positive duration never appears in a report.
    pub fn is_empty(&self) -> bool {
        self.duration() <= Duration::zero()
    }

    /// Intersects this activity with `[start, end]`.
    ///
    /// The result may be empty when the two intervals do not overlap; the
    /// caller decides whether to keep it.
    #[must_use]
    pub fn clip(&self, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self {
            name: self.name.clone(),
            start: self.start.max(start),
            end: self.end.min(end),
            is_current: self.is_current,
            comment: self.comment.clone(),
        }
    }
}
