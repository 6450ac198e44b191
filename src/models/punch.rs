//! Attendance punch model.
//!
//! A punch is one entry/exit pair recorded by the capture system for an
//! employee. Punches are normalized from raw record-store JSON through the
//! field-resolution tables in [`super::fields`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::calculation::{parse_timestamp_value, punch_duration};

use super::fields::{self, FieldResolver, UNKNOWN};
use super::hours::Hours;

/// A single entry/exit punch for an employee.
///
/// Timestamps are local wall-clock times. `None` means the timestamp was
/// absent (still clocked in) or could not be parsed; either way the punch
/// is excluded from time windows on that field and its duration is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePunch {
    /// Unique identifier for the punch.
    pub id: String,
    /// The employee who punched.
    pub employee_id: String,
    /// Clock-in time.
    pub entry_time: Option<NaiveDateTime>,
    /// Clock-out time.
    pub exit_time: Option<NaiveDateTime>,
}

impl AttendancePunch {
    /// Normalizes one raw record.
    ///
    /// Missing identifiers become `"unknown"`; unparseable timestamps are
    /// logged and stored as `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::models::AttendancePunch;
    /// use serde_json::json;
    ///
    /// let punch = AttendancePunch::from_value(&json!({
    ///     "ID": 1,
    ///     "EmployeeID": "e1",
    ///     "EntryTime": "2024-03-15T09:00:00",
    ///     "ExitTime": null
    /// }));
    /// assert_eq!(punch.employee_id, "e1");
    /// assert!(punch.entry_time.is_some());
    /// assert!(punch.exit_time.is_none());
    /// ```
    pub fn from_value(record: &Value) -> Self {
        let id = fields::PUNCH_ID
            .resolve_string(record)
            .unwrap_or_else(|| UNKNOWN.to_string());
        let employee_id = fields::PUNCH_EMPLOYEE_ID
            .resolve_string(record)
            .unwrap_or_else(|| UNKNOWN.to_string());
        let entry_time = resolve_timestamp(&fields::ENTRY_TIME, record, &id);
        let exit_time = resolve_timestamp(&fields::EXIT_TIME, record, &id);

        Self {
            id,
            employee_id,
            entry_time,
            exit_time,
        }
    }

    /// Normalizes a batch of raw records, preserving order.
    pub fn from_values(records: &[Value]) -> Vec<Self> {
        records.iter().map(Self::from_value).collect()
    }

    /// Returns the elapsed hours between entry and exit.
    pub fn total_hours(&self) -> Hours {
        punch_duration(self.entry_time, self.exit_time)
    }
}

fn resolve_timestamp(
    resolver: &FieldResolver,
    record: &Value,
    punch_id: &str,
) -> Option<NaiveDateTime> {
    let raw = resolver.resolve(record)?;
    match parse_timestamp_value(raw) {
        Ok(timestamp) => Some(timestamp),
        Err(err) => {
            warn!(
                punch_id = %punch_id,
                field = resolver.name,
                error = %err,
                "Unparseable punch timestamp"
            );
            None
        }
    }
}
