//! The attendance list view.

use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculation::format_timestamp;
use crate::config::EngineConfig;
use crate::models::{AttendancePunch, Hours};

use super::query::{View, ViewQuery};
use super::record::{FieldValue, Record};
use super::stages::run;

const SORTABLE_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S";

/// One row of the attendance list: a punch with its duration.
///
/// Timestamps are exposed to search and sort as ISO-8601 text, which
/// orders chronologically. An employee id written as a plain integer
/// (`"7"`, `"12"`) is exposed as a number, so such ids sort numerically;
/// any other id is text and sorts after them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRow {
    /// The punch id.
    pub id: String,
    /// The employee who punched.
    pub employee_id: String,
    /// Clock-in time; the row's timestamp for window filters.
    pub entry_time: Option<NaiveDateTime>,
    /// Clock-out time.
    pub exit_time: Option<NaiveDateTime>,
    /// Hours between entry and exit.
    pub total_hours: Hours,
}

impl AttendanceRow {
    /// Field name of the punch id.
    pub const ID: &'static str = "id";
    /// Field name of the employee id.
    pub const EMPLOYEE_ID: &'static str = "employee_id";
    /// Field name of the entry time.
    pub const ENTRY_TIME: &'static str = "entry_time";
    /// Field name of the exit time.
    pub const EXIT_TIME: &'static str = "exit_time";
    /// Field name of the duration; sorts numerically.
    pub const TOTAL_HOURS: &'static str = "total_hours";

    /// Entry time formatted for display.
    pub fn entry_display(&self, unknown_label: &str) -> String {
        format_timestamp(self.entry_time, unknown_label)
    }

    /// Exit time formatted for display.
    pub fn exit_display(&self, unknown_label: &str) -> String {
        format_timestamp(self.exit_time, unknown_label)
    }
}

impl From<&AttendancePunch> for AttendanceRow {
    fn from(punch: &AttendancePunch) -> Self {
        Self {
            id: punch.id.clone(),
            employee_id: punch.employee_id.clone(),
            entry_time: punch.entry_time,
            exit_time: punch.exit_time,
            total_hours: punch.total_hours(),
        }
    }
}

fn timestamp_field(t: Option<NaiveDateTime>) -> FieldValue {
    t.map(|t| t.format(SORTABLE_TIMESTAMP).to_string()).into()
}

/// Digits only, without leading zeros, so the number prints back as the
/// same text the search stage sees.
fn id_field(id: &str) -> FieldValue {
    let canonical = !id.is_empty()
        && id.bytes().all(|b| b.is_ascii_digit())
        && (id == "0" || !id.starts_with('0'));
    match canonical.then(|| Decimal::from_str(id).ok()).flatten() {
        Some(number) => FieldValue::Number(number),
        None => FieldValue::Text(id.to_string()),
    }
}

impl Record for AttendanceRow {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.entry_time
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            Self::ID => FieldValue::Text(self.id.clone()),
            Self::EMPLOYEE_ID => id_field(&self.employee_id),
            Self::ENTRY_TIME => timestamp_field(self.entry_time),
            Self::EXIT_TIME => timestamp_field(self.exit_time),
            Self::TOTAL_HOURS => self.total_hours.known().into(),
            _ => FieldValue::Missing,
        }
    }
}

/// Runs an attendance list query over raw punches.
///
/// # Example
///
/// ```
/// use attendance_engine::config::EngineConfig;
/// use attendance_engine::models::{AttendancePunch, FilterSpec};
/// use attendance_engine::pipeline::{attendance_view, ViewQuery};
/// use chrono::NaiveDateTime;
/// use serde_json::json;
///
/// let punches = AttendancePunch::from_values(&[
///     json!({"id": "p1", "EmployeeID": 7, "EntryTime": "2024-03-15T09:00:00", "ExitTime": "2024-03-15T17:30:00"}),
///     json!({"id": "p2", "EmployeeID": 8, "EntryTime": "2024-02-01T09:00:00"}),
/// ]);
/// let now = NaiveDateTime::parse_from_str("2024-03-15 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
///
/// let view = attendance_view(&punches, &ViewQuery::attendance_default(5), now, &EngineConfig::default());
/// assert_eq!(view.total, 1);
/// assert_eq!(view.rows[0].total_hours.to_string(), "8.50");
/// ```
pub fn attendance_view(
    punches: &[AttendancePunch],
    query: &ViewQuery,
    now: NaiveDateTime,
    config: &EngineConfig,
) -> View<AttendanceRow> {
    let rows: Vec<AttendanceRow> = punches.iter().map(AttendanceRow::from).collect();
    let view = run(rows, query, now, config.week_start);

    debug!(
        window = ?query.filter().window,
        total = view.total,
        page = view.page.index,
        "Attendance view built"
    );

    view
}
