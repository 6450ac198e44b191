//! Derived dashboard models.
//!
//! This module contains the [`DashboardSummary`] type and the table rows it
//! carries. All of these are rebuilt from scratch on every aggregation pass
//! and never persisted.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::format_timestamp;
use crate::source::Collection;

use super::hours::Hours;

/// The most recent punch of one employee, with its duration.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{Hours, ResolvedAttendance};
/// use chrono::NaiveDateTime;
///
/// let row = ResolvedAttendance {
///     employee_id: "e1".to_string(),
///     entry_time: NaiveDateTime::parse_from_str("2024-03-15 09:00:00", "%Y-%m-%d %H:%M:%S").ok(),
///     exit_time: None,
///     total_hours: Hours::Unknown,
/// };
/// assert_eq!(row.entry_display("unknown"), "03-15-2024 09:00:00");
/// assert_eq!(row.exit_display("unknown"), "unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAttendance {
    /// The employee the punch belongs to.
    pub employee_id: String,
    /// Clock-in time of the latest punch.
    pub entry_time: Option<NaiveDateTime>,
    /// Clock-out time of the latest punch.
    pub exit_time: Option<NaiveDateTime>,
    /// Hours between entry and exit.
    pub total_hours: Hours,
}

impl ResolvedAttendance {
    /// Entry time formatted for display.
    pub fn entry_display(&self, unknown_label: &str) -> String {
        format_timestamp(self.entry_time, unknown_label)
    }

    /// Exit time formatted for display.
    pub fn exit_display(&self, unknown_label: &str) -> String {
        format_timestamp(self.exit_time, unknown_label)
    }
}

/// One row of the overtime table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeRow {
    /// The employee the row describes.
    pub employee_id: String,
    /// Hours of the employee's latest punch.
    pub total_hours: Hours,
    /// Hours beyond the daily threshold.
    pub overtime_hours: Hours,
}

/// Summary statistics for the executive dashboard.
///
/// Every field is derived; a collection that failed to load contributes its
/// empty default and is listed in `unavailable`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Number of employee records.
    pub employee_count: usize,
    /// Employees per department (`"unknown"` for missing departments).
    pub department_counts: BTreeMap<String, usize>,
    /// Number of distinct department keys.
    pub department_count: usize,
    /// Employees per hire year (`"unknown"` for missing or bad dates).
    pub hire_year_histogram: BTreeMap<String, usize>,
    /// Salary of each employee, in employee order.
    pub salary_series: Vec<Decimal>,
    /// Mean of `salary_series`, zero when there are no employees.
    pub average_salary: Decimal,
    /// Number of leave requests.
    pub leave_count: usize,
    /// Number of projects.
    pub project_count: usize,
    /// Number of projects with status "Active".
    pub active_project_count: usize,
    /// Number of meeting rooms.
    pub meeting_room_count: usize,
    /// Number of payroll records.
    pub payroll_count: usize,
    /// Latest punch per employee.
    pub attendance_table: Vec<ResolvedAttendance>,
    /// Overtime per employee, derived from `attendance_table`.
    pub overtime_table: Vec<OvertimeRow>,
    /// Collections that failed to load for this summary.
    pub unavailable: Vec<Collection>,
}

impl DashboardSummary {
    /// Returns true if every collection loaded.
    pub fn is_complete(&self) -> bool {
        self.unavailable.is_empty()
    }
}

/// An immutable, published dashboard state.
///
/// Each refresh produces a new snapshot that wholly replaces the previous
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Unique identifier for this refresh.
    pub id: Uuid,
    /// When the snapshot was built.
    pub generated_at: DateTime<Utc>,
    /// The derived statistics.
    pub summary: DashboardSummary,
}

/// A single step in a calculation trail.
///
/// Each step captures the input, output, and reasoning for one rule
/// application so an operator can see how a figure was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the step.
    pub reasoning: String,
}
