//! Time predicates and timestamp parsing.
//!
//! This module classifies timestamps into the windows the attendance list
//! and dashboard filter by (today, this week, a month, a year), and parses
//! the timestamp formats the record store emits. All predicates take the
//! reference "now" explicitly so a whole query is evaluated against one
//! instant.

use chrono::{
    DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday,
};
use serde_json::Value;

use crate::error::{EngineError, EngineResult};
use crate::models::{FilterSpec, WindowKind};

/// Display format for timestamps on the dashboard tables.
pub const DISPLAY_FORMAT: &str = "%m-%d-%Y %H:%M:%S";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Returns the current local wall-clock time.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parses a timestamp string into local wall-clock time.
///
/// Accepted forms:
/// - RFC 3339 with an offset (`2024-03-15T10:00:00Z`), converted to local time
/// - RFC 2822 (`Fri, 15 Mar 2024 10:00:00 GMT`), converted to local time
/// - naive ISO 8601 (`2024-03-15T10:00:00`, optional fraction, `T` or space)
/// - a bare date (`2024-03-15`), taken as local midnight
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::parse_timestamp;
/// use chrono::{Datelike, Timelike};
///
/// let t = parse_timestamp("2024-03-15T10:00:00").unwrap();
/// assert_eq!((t.month(), t.day(), t.hour()), (3, 15, 10));
/// assert!(parse_timestamp("last tuesday").is_err());
/// ```
pub fn parse_timestamp(raw: &str) -> EngineResult<NaiveDateTime> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(EngineError::ParseError {
        value: raw.to_string(),
        message: "unrecognized timestamp format".to_string(),
    })
}

/// Parses a JSON timestamp: a string, or a number of epoch milliseconds.
pub fn parse_timestamp_value(value: &Value) -> EngineResult<NaiveDateTime> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Local.timestamp_millis_opt(millis).single())
            .map(|dt| dt.naive_local())
            .ok_or_else(|| EngineError::ParseError {
                value: n.to_string(),
                message: "epoch milliseconds out of range".to_string(),
            }),
        other => Err(EngineError::ParseError {
            value: other.to_string(),
            message: "expected a string or epoch milliseconds".to_string(),
        }),
    }
}

/// Formats a timestamp as `MM-DD-YYYY HH:MM:SS`, or the unknown label.
pub fn format_timestamp(timestamp: Option<NaiveDateTime>, unknown_label: &str) -> String {
    match timestamp {
        Some(t) => t.format(DISPLAY_FORMAT).to_string(),
        None => unknown_label.to_string(),
    }
}

/// Returns true if `t` is on the same calendar day as `now`.
pub fn is_today(t: NaiveDateTime, now: NaiveDateTime) -> bool {
    t.date() == now.date()
}

/// The seven calendar days of one week, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    /// First day of the week.
    pub start: NaiveDate,
    /// Last day of the week (`start` + 6 days).
    pub end: NaiveDate,
}

impl WeekRange {
    /// Returns the week containing `day`, starting on `week_start`.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::calculation::WeekRange;
    /// use chrono::{NaiveDate, Weekday};
    ///
    /// // 2024-03-13 is a Wednesday
    /// let week = WeekRange::containing(NaiveDate::from_ymd_opt(2024, 3, 13).unwrap(), Weekday::Sun);
    /// assert_eq!(week.start, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    /// assert_eq!(week.end, NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    /// ```
    pub fn containing(day: NaiveDate, week_start: Weekday) -> Self {
        let offset = (7 + day.weekday().num_days_from_sunday()
            - week_start.num_days_from_sunday())
            % 7;
        let start = day - chrono::Duration::days(i64::from(offset));
        Self {
            start,
            end: start + chrono::Duration::days(6),
        }
    }

    /// Returns true if `t` falls on one of the week's days.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        let date = t.date();
        date >= self.start && date <= self.end
    }
}

/// Returns true if `t` falls in the calendar week containing `now`.
pub fn is_this_week(t: NaiveDateTime, now: NaiveDateTime, week_start: Weekday) -> bool {
    WeekRange::containing(now.date(), week_start).contains(t)
}

/// Returns true if `t` is in the zero-based `month` of `year`.
pub fn is_specific_month(t: NaiveDateTime, month: u32, year: i32) -> bool {
    t.month0() == month && t.year() == year
}

/// Returns true if `t` is in `year`.
pub fn is_specific_year(t: NaiveDateTime, year: i32) -> bool {
    t.year() == year
}

/// A [`FilterSpec`] resolved against a single reference instant.
///
/// Resolving once per query keeps every record in the query judged against
/// the same day and week, even if the clock crosses midnight meanwhile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// Matches every record, including ones without a timestamp.
    All,
    /// Matches one calendar day.
    Day(NaiveDate),
    /// Matches one calendar week.
    Week(WeekRange),
    /// Matches a month and year; `None` components match anything.
    Month {
        /// Zero-based month.
        month: Option<u32>,
        /// Calendar year.
        year: Option<i32>,
    },
    /// Matches a year; `None` matches any year.
    Year(Option<i32>),
}

impl TimeWindow {
    /// Resolves `spec` against `now`.
    pub fn resolve(spec: &FilterSpec, now: NaiveDateTime, week_start: Weekday) -> Self {
        match spec.window {
            WindowKind::All => TimeWindow::All,
            WindowKind::Today => TimeWindow::Day(now.date()),
            WindowKind::ThisWeek => TimeWindow::Week(WeekRange::containing(now.date(), week_start)),
            WindowKind::SpecificMonth => TimeWindow::Month {
                month: spec.month,
                year: spec.year,
            },
            WindowKind::SpecificYear => TimeWindow::Year(spec.year),
        }
    }

    /// Returns true if a record with timestamp `t` belongs to the window.
    ///
    /// Records without a (parseable) timestamp only match [`TimeWindow::All`].
    pub fn matches(&self, t: Option<NaiveDateTime>) -> bool {
        let t = match (self, t) {
            (TimeWindow::All, _) => return true,
            (_, None) => return false,
            (_, Some(t)) => t,
        };

        match *self {
            TimeWindow::All => true,
            TimeWindow::Day(day) => t.date() == day,
            TimeWindow::Week(week) => week.contains(t),
            TimeWindow::Month { month, year } => {
                month.is_none_or(|m| t.month0() == m) && year.is_none_or(|y| t.year() == y)
            }
            TimeWindow::Year(year) => year.is_none_or(|y| is_specific_year(t, y)),
        }
    }
}
