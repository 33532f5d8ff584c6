//! Activity derivation.
//!
//! Turns the entry log into the activities of one report:
//!
//! 1. Pair adjacent entries into raw activities
//! 2. Clip each to the report window, dropping empty results
//! 3. Append the still-running activity, if any
//! 4. Remove end-of-day markers
//! 5. Keep only the requested project
//!
//! The order is significant: the current activity is appended before the
//! last two stages so it is subject to both.

use chrono::{DateTime, FixedOffset};

use crate::activity::Activity;
use crate::clock::{LocalTimezone, Now};
use crate::entry::{END_ENTRY_NAME, Entry};
use crate::name::Name;
use crate::report::{ReportArgs, ReportWindow};

/// Computes the activities for a report.
///
/// `entries` must be in chronological order. The clock is read once.
pub fn activities<N, Z>(args: &ReportArgs, now: &N, tz: &Z, entries: &[Entry]) -> Vec<Activity>
where
    N: Now + ?Sized,
    Z: LocalTimezone + ?Sized,
{
    let window = ReportWindow::new(args.range, tz);

    let clipped: Vec<Activity> =
        clip_to_window(pair_entries(entries), window.start, window.end).collect();
    tracing::debug!(
        entries = entries.len(),
        clipped = clipped.len(),
        start = %window.start,
        end = %window.end,
        "clipped activities to report window"
    );

    let current = current_activity(
        args.current_activity_name.as_deref(),
        entries.last(),
        now.now(),
        window.start,
        window.end_exclusive,
    );

    let result: Vec<Activity> = filter_by_project(
        remove_end_activities(clipped.into_iter().chain(current)),
        args.project.as_deref(),
    )
    .collect();
    tracing::debug!(activities = result.len(), project = ?args.project, "derived activities");

    result
}

/// Pairs each entry with its successor.
///
/// The earlier entry names the activity; the later one closes it and
/// supplies its comment.
pub fn pair_entries(entries: &[Entry]) -> impl Iterator<Item = Activity> {
    entries.windows(2).map(|pair| {
        let (prev, next) = (&pair[0], &pair[1]);
        Activity::new(
            Name::parse(prev.name.as_str()),
            prev.timestamp,
            next.timestamp,
            false,
            next.comment.clone(),
        )
    })
}

/// Clips activities to `[start, end]` and drops those left empty.
pub fn clip_to_window<I>(
    activities: I,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> impl Iterator<Item = Activity>
where
    I: IntoIterator<Item = Activity>,
{
    activities
        .into_iter()
        .map(move |activity| activity.clip(start, end))
        .filter(|activity| !activity.is_empty())
}

/// Synthesizes the activity still running at `now`.
///
/// Starts at the last entry (or the window start, whichever is later) and
/// ends at `now`. Nothing is produced without a label, for an empty log,
/// after an end-of-day marker, or when `now` falls outside
/// `(start, end_exclusive]`.
pub fn current_activity(
    label: Option<&str>,
    last_entry: Option<&Entry>,
    now: DateTime<FixedOffset>,
    window_start: DateTime<FixedOffset>,
    window_end_exclusive: DateTime<FixedOffset>,
) -> Option<Activity> {
    let label = label?;
    let last_entry = last_entry.filter(|entry| !entry.is_end())?;

    let start = last_entry.timestamp.max(window_start);
    if !(start < now && now <= window_end_exclusive) {
        return None;
    }

    tracing::trace!(%start, %now, name = %last_entry.name, "synthesized current activity");
    Some(Activity::new(
        Name::parse(format!("{label} {}", last_entry.name)),
        start,
        now,
        true,
        None,
    ))
}

/// Drops end-of-day markers.
pub fn remove_end_activities<I>(activities: I) -> impl Iterator<Item = Activity>
where
    I: IntoIterator<Item = Activity>,
{
    activities
        .into_iter()
        .filter(|activity| activity.name.as_str() != END_ENTRY_NAME)
}

/// Keeps activities whose project equals `project`, or all when `None`.
pub fn filter_by_project<I>(activities: I, project: Option<&str>) -> impl Iterator<Item = Activity>
where
    I: IntoIterator<Item = Activity>,
{
    activities
        .into_iter()
        .filter(move |activity| project.is_none_or(|p| activity.name.project() == p))
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, NaiveDate, TimeZone};

    use crate::report::DateRange;

    /// Tests run in UTC+02:00 so local midnight differs from UTC midnight.
    fn tz() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(2025, 1, day, hour, minute, 0).unwrap()
    }

    fn entry(name: &str, timestamp: DateTime<FixedOffset>) -> Entry {
        Entry::new(timestamp, name, None).unwrap()
    }

    fn entry_with_comment(name: &str, timestamp: DateTime<FixedOffset>, comment: &str) -> Entry {
        Entry::new(timestamp, name, Some(comment.to_string())).unwrap()
    }

    fn names(activities: &[Activity]) -> Vec<&str> {
        activities.iter().map(|a| a.name.as_str()).collect()
    }

    // ========== Pairing ==========

    #[test]
    fn pairing_yields_one_activity_per_adjacent_pair() {
        let entries = vec![
            entry("hello", at(29, 8, 0)),
            entry("utt: coding", at(29, 9, 0)),
            entry("lunch", at(29, 12, 0)),
            entry("end", at(29, 17, 0)),
        ];

        let raw: Vec<Activity> = pair_entries(&entries).collect();

        assert_eq!(raw.len(), entries.len() - 1);
        for (i, activity) in raw.iter().enumerate() {
            assert_eq!(activity.name.as_str(), entries[i].name);
            assert_eq!(activity.start, entries[i].timestamp);
            assert_eq!(activity.end, entries[i + 1].timestamp);
            assert!(!activity.is_current);
        }
    }

    #[test]
    fn pairing_takes_comment_from_closing_entry() {
        let entries = vec![
            entry_with_comment("coding", at(29, 9, 0), "ignored"),
            entry_with_comment("end", at(29, 17, 0), "shipped the parser"),
        ];

        let raw: Vec<Activity> = pair_entries(&entries).collect();

        assert_eq!(raw[0].comment.as_deref(), Some("shipped the parser"));
    }

    #[test]
    fn pairing_needs_two_entries() {
        assert_eq!(pair_entries(&[]).count(), 0);
        assert_eq!(pair_entries(&[entry("coding", at(29, 9, 0))]).count(), 0);
    }

    // ========== Clipping ==========

    #[test]
    fn clipped_activities_stay_inside_window() {
        let entries = vec![
            entry("night shift", at(28, 22, 0)),
            entry("coding", at(29, 9, 0)),
            entry("late", at(29, 23, 0)),
            entry("next day", at(30, 1, 0)),
            entry("end", at(30, 3, 0)),
        ];
        let window = ReportWindow::new(DateRange::day(date(29)), &tz());

        let clipped: Vec<Activity> =
            clip_to_window(pair_entries(&entries), window.start, window.end).collect();

        assert_eq!(names(&clipped), ["night shift", "coding", "late"]);
        for activity in &clipped {
            assert!(window.start <= activity.start);
            assert!(activity.start < activity.end);
            assert!(activity.end <= window.end);
        }
        assert_eq!(clipped[0].start, window.start);
        assert_eq!(clipped[2].end, window.end);
    }

    #[test]
    fn clipping_a_contained_activity_changes_nothing() {
        let entries = vec![
            entry("coding", at(29, 9, 0)),
            entry_with_comment("end", at(29, 17, 0), "done"),
        ];
        let window = ReportWindow::new(DateRange::day(date(29)), &tz());

        let raw: Vec<Activity> = pair_entries(&entries).collect();
        let clipped: Vec<Activity> =
            clip_to_window(raw.clone(), window.start, window.end).collect();

        assert_eq!(clipped, raw);
    }

    #[test]
    fn zero_length_activities_are_dropped() {
        let entries = vec![
            entry("blink", at(29, 9, 0)),
            entry("coding", at(29, 9, 0)),
            entry("end", at(29, 10, 0)),
        ];
        let window = ReportWindow::new(DateRange::day(date(29)), &tz());

        let clipped: Vec<Activity> =
            clip_to_window(pair_entries(&entries), window.start, window.end).collect();

        assert_eq!(names(&clipped), ["coding"]);
    }

    // ========== Current activity ==========

    #[test]
    fn current_activity_requires_label_entry_and_no_end_marker() {
        let window = ReportWindow::new(DateRange::day(date(29)), &tz());
        let now = at(29, 10, 0);
        let last = entry("coding", at(29, 9, 0));
        let end = entry("end", at(29, 9, 0));

        assert!(current_activity(None, Some(&last), now, window.start, window.end_exclusive).is_none());
        assert!(current_activity(Some("working on"), None, now, window.start, window.end_exclusive).is_none());
        assert!(
            current_activity(Some("working on"), Some(&end), now, window.start, window.end_exclusive)
                .is_none()
        );
    }

    #[test]
    fn current_activity_runs_from_last_entry_to_now() {
        let window = ReportWindow::new(DateRange::day(date(29)), &tz());
        let last = entry("coding", at(29, 9, 0));

        let current = current_activity(
            Some("working on"),
            Some(&last),
            at(29, 10, 0),
            window.start,
            window.end_exclusive,
        )
        .unwrap();

        assert_eq!(current.name.as_str(), "working on coding");
        assert_eq!(current.start, at(29, 9, 0));
        assert_eq!(current.end, at(29, 10, 0));
        assert!(current.is_current);
        assert_eq!(current.comment, None);
    }

    #[test]
    fn current_activity_starts_no_earlier_than_window() {
        let window = ReportWindow::new(DateRange::day(date(29)), &tz());
        let last = entry("coding", at(28, 20, 0));

        let current = current_activity(
            Some("working on"),
            Some(&last),
            at(29, 1, 0),
            window.start,
            window.end_exclusive,
        )
        .unwrap();

        assert_eq!(current.start, window.start);
        assert_eq!(current.duration(), Duration::hours(1));
    }

    #[test]
    fn current_activity_may_end_exactly_at_exclusive_bound() {
        let window = ReportWindow::new(DateRange::day(date(29)), &tz());
        let last = entry("coding", at(29, 22, 0));

        let at_bound = current_activity(
            Some("working on"),
            Some(&last),
            window.end_exclusive,
            window.start,
            window.end_exclusive,
        );
        assert!(at_bound.is_some());

        let past_bound = current_activity(
            Some("working on"),
            Some(&last),
            window.end_exclusive + Duration::seconds(1),
            window.start,
            window.end_exclusive,
        );
        assert!(past_bound.is_none());
    }

    #[test]
    fn current_activity_needs_now_after_start() {
        let window = ReportWindow::new(DateRange::day(date(29)), &tz());
        let last = entry("coding", at(29, 9, 0));

        let same_instant = current_activity(
            Some("working on"),
            Some(&last),
            at(29, 9, 0),
            window.start,
            window.end_exclusive,
        );
        assert!(same_instant.is_none());
    }

    // ========== Sentinel and project filters ==========

    #[test]
    fn end_activities_are_removed_in_order() {
        let entries = vec![
            entry("coding", at(29, 9, 0)),
            entry("end", at(29, 12, 0)),
            entry("review", at(29, 13, 0)),
            entry("end", at(29, 17, 0)),
        ];

        let kept: Vec<Activity> = remove_end_activities(pair_entries(&entries)).collect();

        assert_eq!(names(&kept), ["coding", "review"]);
    }

    #[test]
    fn only_bare_end_is_a_sentinel() {
        let entries = vec![
            entry("proj: end", at(29, 9, 0)),
            entry(" end ", at(29, 10, 0)),
            entry("End", at(29, 11, 0)),
            entry("coding", at(29, 12, 0)),
        ];

        let kept: Vec<Activity> = remove_end_activities(pair_entries(&entries)).collect();

        assert_eq!(names(&kept), ["proj: end", "End"]);
        assert_eq!(kept[0].name.project(), "proj");
        assert_eq!(kept[0].name.task(), "end");
    }

    #[test]
    fn project_filter_is_exact_and_case_sensitive() {
        let entries = vec![
            entry("utt: coding", at(29, 9, 0)),
            entry("Utt: review", at(29, 10, 0)),
            entry("other: meeting", at(29, 11, 0)),
            entry("utt: docs", at(29, 12, 0)),
            entry("end", at(29, 13, 0)),
        ];

        let kept: Vec<Activity> = filter_by_project(pair_entries(&entries), Some("utt")).collect();

        assert_eq!(names(&kept), ["utt: coding", "utt: docs"]);
    }

    #[test]
    fn absent_project_filter_keeps_everything() {
        let entries = vec![
            entry("utt: coding", at(29, 9, 0)),
            entry("lunch", at(29, 12, 0)),
            entry("end", at(29, 13, 0)),
        ];

        let raw: Vec<Activity> = pair_entries(&entries).collect();
        let kept: Vec<Activity> = filter_by_project(raw.clone(), None).collect();

        assert_eq!(kept, raw);
    }

    // ========== Full pipeline ==========

    #[test]
    fn single_day_without_current_activity() {
        let entries = vec![entry("coding", at(29, 9, 0)), entry("end", at(29, 17, 0))];
        let args = ReportArgs::new(DateRange::day(date(29)));

        let result = activities(&args, &at(29, 18, 0), &tz(), &entries);

        assert_eq!(
            result,
            vec![Activity::new(
                Name::parse("coding"),
                at(29, 9, 0),
                at(29, 17, 0),
                false,
                None,
            )]
        );
    }

    #[test]
    fn open_task_becomes_current_activity() {
        let entries = vec![entry("coding", at(29, 9, 0))];
        let args = ReportArgs::new(DateRange::day(date(29))).with_current_activity("working on");

        let result = activities(&args, &at(29, 10, 0), &tz(), &entries);

        assert_eq!(
            result,
            vec![Activity::new(
                Name::parse("working on coding"),
                at(29, 9, 0),
                at(29, 10, 0),
                true,
                None,
            )]
        );
    }

    #[test]
    fn no_current_activity_when_now_precedes_window() {
        let entries = vec![entry("coding", at(29, 9, 0))];
        let args = ReportArgs::new(DateRange::day(date(29))).with_current_activity("working on");

        let result = activities(&args, &at(28, 10, 0), &tz(), &entries);

        assert!(result.is_empty());
    }

    #[test]
    fn range_covering_first_of_two_days() {
        let entries = vec![
            entry("coding", at(29, 9, 0)),
            entry("overnight deploy", at(29, 22, 0)),
            entry("sleep", at(30, 2, 0)),
            entry("review", at(30, 9, 0)),
            entry("end", at(30, 17, 0)),
        ];
        let args = ReportArgs::new(DateRange::day(date(29)));
        let window = ReportWindow::new(args.range, &tz());

        let result = activities(&args, &at(30, 18, 0), &tz(), &entries);

        assert_eq!(names(&result), ["coding", "overnight deploy"]);
        assert_eq!(result[1].start, at(29, 22, 0));
        assert_eq!(result[1].end, window.end);
    }

    #[test]
    fn current_activity_is_subject_to_project_filter() {
        let entries = vec![
            entry("utt: coding", at(29, 9, 0)),
            entry("utt: review", at(29, 11, 0)),
        ];
        let args = ReportArgs::new(DateRange::day(date(29)))
            .with_current_activity("working on")
            .with_project("utt");

        let result = activities(&args, &at(29, 12, 0), &tz(), &entries);

        // "working on utt: review" parses with project "working on utt".
        assert_eq!(names(&result), ["utt: coding"]);
    }

    #[test]
    fn empty_label_still_prefixes_current_name() {
        let entries = vec![entry("coding", at(29, 9, 0)), entry("lunch", at(29, 12, 0))];
        let args = ReportArgs::new(DateRange::day(date(29))).with_current_activity("");

        let result = activities(&args, &at(29, 13, 0), &tz(), &entries);

        assert_eq!(names(&result), ["coding", " lunch"]);
        assert!(result[1].is_current);
    }

    #[test]
    fn end_marker_never_reaches_output() {
        let entries = vec![
            entry("end", at(29, 8, 0)),
            entry("coding", at(29, 9, 0)),
            entry("end", at(29, 12, 0)),
        ];
        let args = ReportArgs::new(DateRange::day(date(29))).with_current_activity("working on");

        let result = activities(&args, &at(29, 13, 0), &tz(), &entries);

        assert_eq!(names(&result), ["coding"]);
    }

    #[test]
    fn empty_log_yields_nothing() {
        let args = ReportArgs::new(DateRange::day(date(29))).with_current_activity("working on");
        let result = activities(&args, &at(29, 13, 0), &tz(), &[]);
        assert!(result.is_empty());
    }

    #[test]
    fn current_activity_follows_clipped_activities() {
        let entries = vec![
            entry("coding", at(29, 9, 0)),
            entry("review", at(29, 11, 0)),
        ];
        let args = ReportArgs::new(DateRange::day(date(29))).with_current_activity("working on");

        let result = activities(&args, &at(29, 11, 30), &tz(), &entries);

        assert_eq!(names(&result), ["coding", "working on review"]);
        assert!(!result[0].is_current);
        assert!(result[1].is_current);
        assert_eq!(result[1].duration(), Duration::minutes(30));
    }
}
