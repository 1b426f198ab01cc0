//! Time utilities: year-month keys, ISO week period keys and weekly ranges.
//!
//! Timestamps are ISO-8601 strings (`2024-01-15` or `2024-01-15T10:30:00Z`).
//! Only the calendar date part is ever read; no timezone conversion happens.

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Days, NaiveDate, SecondsFormat, Utc, Weekday};

/// `"YYYY-MM"` for an ISO timestamp: the first two `-` separated components.
pub fn year_month(time_stamp: &str) -> String {
    let mut parts = time_stamp.splitn(3, '-');
    let year = parts.next().unwrap_or_default();
    match parts.next() {
        Some(month) => format!("{year}-{month}"),
        None => year.to_string(),
    }
}

/// Parse the calendar date at the start of an ISO timestamp.
pub fn parse_date(time_stamp: &str) -> Result<NaiveDate> {
    let date_part = time_stamp.get(..10).unwrap_or(time_stamp);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| anyhow!("invalid ISO-8601 timestamp '{time_stamp}': {e}"))
}

/// ISO week key (`"2024-W03"`) for a date.
///
/// The year is the ISO week-numbering year, so 2021-01-03 maps to `2020-W53`.
pub fn date_to_period_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{:04}-W{:02}", week.year(), week.week())
}

/// ISO week key for an ISO timestamp.
pub fn year_week(time_stamp: &str) -> Result<String> {
    Ok(date_to_period_key(parse_date(time_stamp)?))
}

/// Monday of the ISO week named by `key`.
pub fn period_key_to_date(key: &str) -> Result<NaiveDate> {
    let (year, week) = key
        .split_once("-W")
        .ok_or_else(|| anyhow!("invalid week key '{key}' (expected YYYY-Www)"))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("invalid year in week key '{key}'"))?;
    let week: u32 = week
        .parse()
        .with_context(|| format!("invalid week in week key '{key}'"))?;

    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
        .ok_or_else(|| anyhow!("week key '{key}' does not exist in the ISO calendar"))
}

/// Weekly period keys covering `start..=end`.
///
/// Steps a date forward 7 days at a time from `start` while it is strictly
/// before `end`, emitting the week key of each visited date. The week
/// containing `end` closes the sequence when the stepping stopped short of it.
pub fn generate_periods_for_range(start: &str, end: &str) -> Result<Vec<String>> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;

    let mut periods = Vec::new();
    let mut current = start;
    while current < end {
        periods.push(date_to_period_key(current));
        current = current
            .checked_add_days(Days::new(7))
            .context("date overflow while generating weekly periods")?;
    }

    let closing = date_to_period_key(end);
    if periods.last() != Some(&closing) {
        periods.push(closing);
    }

    Ok(periods)
}

/// Current UTC time as `2026-02-21T05:59:00.000Z`.
pub fn current_iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
