//! Report parameters: the calendar range and its localized window.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::clock::LocalTimezone;
use crate::types::ValidationError;

/// Inclusive range of calendar days in the user's local calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting a start after the end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A single-day range.
    pub const fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Monday through Sunday of the week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let days_since_monday = date.weekday().num_days_from_monday();
        let monday = date - Duration::days(i64::from(days_since_monday));
        Self {
            start: monday,
            end: monday + Duration::days(6),
        }
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Everything a report needs besides the log and the ambient capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArgs {
    pub range: DateRange,
    /// Label prefixed to the still-running activity. `None` disables it.
    pub current_activity_name: Option<String>,
    /// Only keep activities of this project. `None` keeps everything.
    pub project: Option<String>,
}

impl ReportArgs {
    pub const fn new(range: DateRange) -> Self {
        Self {
            range,
            current_activity_name: None,
            project: None,
        }
    }

    #[must_use]
    pub fn with_current_activity(mut self, label: impl Into<String>) -> Self {
        self.current_activity_name = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }
}

/// A [`DateRange`] expanded to instants in a timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    /// Midnight at the start of the first day.
    pub start: DateTime<FixedOffset>,
    /// Last representable instant of the last day. Activities are clipped to this.
    pub end: DateTime<FixedOffset>,
    /// Midnight starting the day after the range. Bounds the current activity.
    pub end_exclusive: DateTime<FixedOffset>,
}

impl ReportWindow {
    pub fn new<Z: LocalTimezone + ?Sized>(range: DateRange, tz: &Z) -> Self {
        // Wraps around to 23:59:59.999999.
        let last_instant = NaiveTime::MIN - Duration::microseconds(1);

        let start = tz.localize(range.start.and_time(NaiveTime::MIN));
        let end = tz.localize(range.end.and_time(last_instant));
        let end_exclusive = range
            .end
            .succ_opt()
            .map_or(end, |next| tz.localize(next.and_time(NaiveTime::MIN)));

        Self {
            start,
            end,
            end_exclusive,
        }
    }
}
