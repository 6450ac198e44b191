//! Latest-punch resolution and punch durations.
//!
//! The dashboard shows one row per employee: the punch with the latest
//! entry time. This module picks that punch and computes its duration.

use std::collections::HashMap;

use chrono::{Local, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;

use crate::models::{AttendancePunch, Hours, ResolvedAttendance};

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Returns the hours elapsed between `entry` and `exit` in the local time
/// zone, rounded to two decimals.
///
/// The result is [`Hours::Unknown`] when either timestamp is missing or
/// unparseable, or when the exit precedes the entry. See
/// [`punch_duration_in`] for how clock changes are handled.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::punch_duration;
/// use attendance_engine::models::Hours;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let entry = NaiveDateTime::parse_from_str("2024-03-15 09:00:00", "%Y-%m-%d %H:%M:%S").ok();
/// let exit = NaiveDateTime::parse_from_str("2024-03-15 17:30:00", "%Y-%m-%d %H:%M:%S").ok();
/// assert_eq!(punch_duration(entry, exit), Hours::Known(Decimal::new(850, 2)));
/// assert_eq!(punch_duration(entry, None), Hours::Unknown);
/// ```
pub fn punch_duration(entry: Option<NaiveDateTime>, exit: Option<NaiveDateTime>) -> Hours {
    punch_duration_in(&Local, entry, exit)
}

/// Returns the hours elapsed between two wall-clock times of `tz`.
///
/// Both times are placed on the time line before subtracting, so a punch
/// spanning a daylight-saving change counts the hours actually worked.
/// A time repeated by a clock change resolves to its earlier instant for
/// the entry and its later instant for the exit. A time skipped by a clock
/// change has no instant; the punch then falls back to wall-clock
/// difference.
pub fn punch_duration_in<Tz: TimeZone>(
    tz: &Tz,
    entry: Option<NaiveDateTime>,
    exit: Option<NaiveDateTime>,
) -> Hours {
    let (Some(entry), Some(exit)) = (entry, exit) else {
        return Hours::Unknown;
    };

    let millis = match (
        tz.from_local_datetime(&entry).earliest(),
        tz.from_local_datetime(&exit).latest(),
    ) {
        (Some(start), Some(end)) => (end - start).num_milliseconds(),
        _ => (exit - entry).num_milliseconds(),
    };
    if millis < 0 {
        return Hours::Unknown;
    }

    Hours::from_decimal(Decimal::from(millis) / Decimal::from(MILLIS_PER_HOUR))
}

/// Picks the latest punch of each employee.
///
/// Returns one punch per distinct `employee_id`, in order of each
/// employee's first appearance in `punches`. The winner is the punch with
/// the greatest entry time; when two punches share an entry time, the one
/// later in the input wins. A punch with a parseable entry time always
/// beats one without.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::latest_punches;
/// use attendance_engine::models::AttendancePunch;
/// use serde_json::json;
///
/// let punches = AttendancePunch::from_values(&[
///     json!({"id": "a", "employeeId": "e1", "entryTime": "2024-03-15T09:00:00"}),
///     json!({"id": "b", "employeeId": "e1", "entryTime": "2024-03-15T08:00:00"}),
/// ]);
/// let latest = latest_punches(&punches);
/// assert_eq!(latest.len(), 1);
/// assert_eq!(latest[0].id, "a");
/// ```
pub fn latest_punches(punches: &[AttendancePunch]) -> Vec<&AttendancePunch> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut latest: Vec<&AttendancePunch> = Vec::new();

    for punch in punches {
        match slots.get(punch.employee_id.as_str()).copied() {
            Some(slot) => {
                // Option ordering puts None below every Some.
                if punch.entry_time >= latest[slot].entry_time {
                    latest[slot] = punch;
                }
            }
            None => {
                slots.insert(punch.employee_id.as_str(), latest.len());
                latest.push(punch);
            }
        }
    }

    latest
}

/// Resolves the latest punch of each employee, with its duration.
pub fn resolve_attendance(punches: &[AttendancePunch]) -> Vec<ResolvedAttendance> {
    latest_punches(punches)
        .into_iter()
        .map(|punch| ResolvedAttendance {
            employee_id: punch.employee_id.clone(),
            entry_time: punch.entry_time,
            exit_time: punch.exit_time,
            total_hours: punch.total_hours(),
        })
        .collect()
}
