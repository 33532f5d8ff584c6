//! Report command for turning the entry log into a timesheet.
//!
//! This module implements `utt report` with its range options
//! (a date, --week, --from/--to), the project filter, and output formats
//! (human-readable, JSON).

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use clap::Args;
use serde::Serialize;
use utt_core::{Activity, DateRange, Now, ReportArgs};
use utt_db::Database;

use crate::commands::util::{format_duration, parse_date};
use crate::{Config, Zone};

#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Day to report on: YYYY-MM-DD, 'today' or 'yesterday'. Defaults to today.
    pub date: Option<String>,

    /// Report on the whole week (Monday to Sunday) containing the date.
    #[arg(long)]
    pub week: bool,

    /// First day of the report, overriding the date.
    #[arg(long)]
    pub from: Option<String>,

    /// Last day of the report, overriding the date.
    #[arg(long)]
    pub to: Option<String>,

    /// Only show activities of this project.
    #[arg(long)]
    pub project: Option<String>,

    /// Do not include the task still in progress.
    #[arg(long)]
    pub no_current_activity: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub generated_at: DateTime<FixedOffset>,
    pub range: DateRange,
    pub zone: Zone,
    pub activities: Vec<Activity>,
}

// ========== Range Resolution ==========

/// Resolves the command's date options into a range, relative to `today`.
pub fn resolve_range(args: &ReportCommand, today: NaiveDate) -> Result<DateRange> {
    let date = args
        .date
        .as_deref()
        .map_or(Ok(today), |s| parse_date(s, today))?;
    let base = if args.week {
        DateRange::week_of(date)
    } else {
        DateRange::day(date)
    };

    let start = args
        .from
        .as_deref()
        .map_or(Ok(base.start()), |s| parse_date(s, today))?;
    let end = args
        .to
        .as_deref()
        .map_or(Ok(base.end()), |s| parse_date(s, today))?;

    DateRange::new(start, end).context("invalid report range")
}

// ========== Report Generation ==========

/// Computes the report from the entry log.
///
/// The clock is read once; the same instant drives range resolution and
/// the current activity.
pub fn generate_report_data<N: Now + ?Sized>(
    args: &ReportCommand,
    config: &Config,
    db: &Database,
    clock: &N,
) -> Result<ReportData> {
    let zone = config.zone()?;
    let now = zone.convert(clock.now());
    let range = resolve_range(args, now.date_naive())?;

    let mut report_args = ReportArgs::new(range);
    if !args.no_current_activity {
        report_args.current_activity_name = config.current_activity_label().map(String::from);
    }
    report_args.project.clone_from(&args.project);

    let entries = db.list_entries().context("failed to read entry log")?;
    let activities = utt_core::activities(&report_args, &now, &zone, &entries);

    Ok(ReportData {
        generated_at: now,
        range,
        zone,
        activities,
    })
}

fn describe_range(range: DateRange) -> String {
    if range.start() == range.end() {
        // "Wednesday, Jan 29, 2025"
        range.start().format("%A, %b %-d, %Y").to_string()
    } else {
        // "Jan 27, 2025 - Feb 2, 2025"
        format!(
            "{} - {}",
            range.start().format("%b %-d, %Y"),
            range.end().format("%b %-d, %Y")
        )
    }
}

fn duration_ms(activity: &Activity) -> i64 {
    activity.duration().num_milliseconds()
}

/// Total time per project, longest first.
fn project_totals(activities: &[Activity]) -> Vec<(&str, i64)> {
    let mut totals: HashMap<&str, i64> = HashMap::new();
    for activity in activities {
        *totals.entry(activity.name.project()).or_default() += duration_ms(activity);
    }

    let mut totals: Vec<_> = totals.into_iter().collect();
    totals.sort_by_key(|&(project, ms)| (Reverse(ms), project));
    totals
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();

    writeln!(output, "TIME REPORT: {}", describe_range(data.range)).unwrap();

    if data.activities.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No activities recorded.").unwrap();
        return output;
    }

    // ACTIVITIES section, grouped by day when the range spans several
    writeln!(output).unwrap();
    writeln!(output, "ACTIVITIES").unwrap();
    writeln!(output, "──────────").unwrap();

    let multi_day = data.range.start() != data.range.end();
    let mut current_day = None;
    for activity in &data.activities {
        let start = data.zone.convert(activity.start);
        let end = data.zone.convert(activity.end);

        if multi_day && current_day != Some(start.date_naive()) {
            current_day = Some(start.date_naive());
            writeln!(output, "{}", start.format("%A, %b %-d")).unwrap();
        }

        let duration = format_duration(duration_ms(activity));
        let marker = if activity.is_current { "* " } else { "" };
        let comment = activity
            .comment
            .as_deref()
            .map(|c| format!("  [{c}]"))
            .unwrap_or_default();
        writeln!(
            output,
            "{}-{} {duration:>7}  {marker}{}{comment}",
            start.format("%H:%M"),
            end.format("%H:%M"),
            activity.name,
        )
        .unwrap();
    }

    // PROJECTS section
    writeln!(output).unwrap();
    writeln!(output, "PROJECTS").unwrap();
    writeln!(output, "────────").unwrap();
    for (project, ms) in project_totals(&data.activities) {
        let label = if project.is_empty() {
            "(no project)"
        } else {
            project
        };
        writeln!(output, "{label:<24} {:>7}", format_duration(ms)).unwrap();
    }

    // SUMMARY section
    let total: i64 = data.activities.iter().map(duration_ms).sum();
    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Total tracked:  {}", format_duration(total)).unwrap();

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub generated_at: String,
    pub timezone: String,
    pub range: DateRange,
    pub activities: Vec<JsonActivity>,
    pub total_ms: i64,
}

#[derive(Debug, Serialize)]
pub struct JsonActivity {
    pub name: String,
    pub project: String,
    pub task: String,
    pub start: String,
    pub end: String,
    pub duration_ms: i64,
    pub is_current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let activities: Vec<JsonActivity> = data
        .activities
        .iter()
        .map(|activity| JsonActivity {
            name: activity.name.to_string(),
            project: activity.name.project().to_string(),
            task: activity.name.task().to_string(),
            start: data.zone.convert(activity.start).to_rfc3339(),
            end: data.zone.convert(activity.end).to_rfc3339(),
            duration_ms: duration_ms(activity),
            is_current: activity.is_current,
            comment: activity.comment.clone(),
        })
        .collect();

    let report = JsonReport {
        generated_at: data.generated_at.to_rfc3339(),
        timezone: data.zone.name(),
        range: data.range,
        total_ms: activities.iter().map(|a| a.duration_ms).sum(),
        activities,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write, N: Now + ?Sized>(
    writer: &mut W,
    args: &ReportCommand,
    config: &Config,
    db: &Database,
    clock: &N,
) -> Result<()> {
    let data = generate_report_data(args, config, db, clock)?;
    tracing::debug!(
        start = %data.range.start(),
        end = %data.range.end(),
        activities = data.activities.len(),
        "generated report"
    );

    if args.json {
        writeln!(writer, "{}", format_report_json(&data)?)?;
    } else {
        write!(writer, "{}", format_report(&data))?;
    }

    Ok(())
}
