//! Ambient capabilities: the wall clock and the user's timezone.
//!
//! Both are passed into the pipeline explicitly so reports can be computed
//! against a fixed clock and zone.

use chrono::{DateTime, Duration, FixedOffset, Local, LocalResult, NaiveDateTime, TimeZone, Utc};

/// Source of the current instant.
pub trait Now {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The system wall clock, in the local offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Now for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A frozen clock.
impl Now for DateTime<FixedOffset> {
    fn now(&self) -> DateTime<FixedOffset> {
        *self
    }
}

/// Converts naive calendar date-times into zoned instants.
pub trait LocalTimezone {
    fn localize(&self, naive: NaiveDateTime) -> DateTime<FixedOffset>;
}

/// Resolves `naive` in `tz`.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times in a
/// spring-forward gap are moved one hour later; if that is still inside the
/// gap, `naive` is read as UTC.
fn localize_in<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<FixedOffset> {
    earliest(tz.from_local_datetime(&naive))
        .or_else(|| earliest(tz.from_local_datetime(&(naive + Duration::hours(1)))))
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
        .fixed_offset()
}

/// The earlier of the candidate instants.
///
/// `LocalResult::earliest` returns the first candidate, which is not the
/// earlier one for every zone (`Local` lists the later instant first).
fn earliest<Tz: TimeZone>(result: LocalResult<DateTime<Tz>>) -> Option<DateTime<Tz>> {
    match result {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(a, b) => Some(a.min(b)),
        LocalResult::None => None,
    }
}

impl LocalTimezone for Local {
    fn localize(&self, naive: NaiveDateTime) -> DateTime<FixedOffset> {
        localize_in(self, naive)
    }
}

impl LocalTimezone for FixedOffset {
    fn localize(&self, naive: NaiveDateTime) -> DateTime<FixedOffset> {
        localize_in(self, naive)
    }
}

impl LocalTimezone for Utc {
    fn localize(&self, naive: NaiveDateTime) -> DateTime<FixedOffset> {
        localize_in(self, naive)
    }
}
