//! Calendar and countdown helpers.
//!
//! Everything here works on the *local* calendar day of the instant it is
//! given. Date strings are parsed as plain calendar dates, never through a
//! UTC-assuming constructor -- west-of-UTC zones would otherwise see every
//! date shifted back by one day in the evening hours.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone};
use serde::Serialize;

/// End-of-day display window runs midnight to 23:59:59.
const DAY_WINDOW_SECS: i64 = 86_399;

/// Countdown state for the current local day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTiming {
    /// `HH:MM:SS` remaining until local end of day, floor-truncated to the
    /// second and clamped at zero.
    pub time_left_label: String,
    /// Share of the day already elapsed, in `[0, 100]`.
    pub day_percent: f64,
}

/// Compute the countdown label and day-elapsed percentage for `now`.
pub fn day_timing<Tz: TimeZone>(now: &DateTime<Tz>) -> DayTiming {
    let local = now.naive_local();
    let start = local.date().and_time(NaiveTime::MIN);
    let end = start + Duration::seconds(DAY_WINDOW_SECS);

    let total_ms = (end - start).num_milliseconds() as f64;
    let elapsed_ms = (local - start).num_milliseconds() as f64;
    let day_percent = ((elapsed_ms / total_ms) * 100.0).min(100.0);

    let remaining_secs = ((end - local).num_milliseconds().max(0)) / 1000;
    let hrs = remaining_secs / 3600;
    let mins = (remaining_secs % 3600) / 60;
    let secs = remaining_secs % 60;

    DayTiming {
        time_left_label: format!("{hrs:02}:{mins:02}:{secs:02}"),
        day_percent,
    }
}

/// Whether `date_str` (`YYYY-MM-DD`) names the same local calendar date as
/// `now`. Malformed input compares unequal.
pub fn is_same_local_date<Tz: TimeZone>(date_str: &str, now: &DateTime<Tz>) -> bool {
    match parse_local_date(date_str) {
        Some(date) => date == now.naive_local().date(),
        None => false,
    }
}

/// Render `date_str` as "weekday, month day", e.g. `"Mon, Feb 10"`.
/// Malformed input is passed through unchanged.
pub fn format_short_date(date_str: &str) -> String {
    match parse_local_date(date_str) {
        Some(date) => date.format("%a, %b %-d").to_string(),
        None => date_str.to_string(),
    }
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = (date.year(), date.month());
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next_first)) => (next_first - first).num_days() as u32,
        _ => 31,
    }
}

fn parse_local_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}
