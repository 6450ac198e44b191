//! Cross-collection summary statistics.
//!
//! [`aggregate`] turns one fetch result per collection into a
//! [`DashboardSummary`]. It is pure: no clock, no I/O, and a collection
//! that failed to load only empties its own figures.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use crate::calculation::{compute_overtime, resolve_attendance};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{
    AttendancePunch, DashboardSummary, EmployeeRecord, OvertimeRow, ProjectRecord,
    ResolvedAttendance,
};
use crate::source::Collection;

/// Raw records of the six dashboard collections, or the error that
/// prevented loading each one.
#[derive(Debug, Clone)]
pub struct DashboardInputs {
    /// Employee records.
    pub employees: EngineResult<Vec<Value>>,
    /// Leave requests.
    pub leave_requests: EngineResult<Vec<Value>>,
    /// Projects.
    pub projects: EngineResult<Vec<Value>>,
    /// Meeting rooms.
    pub meeting_rooms: EngineResult<Vec<Value>>,
    /// Payroll records.
    pub payrolls: EngineResult<Vec<Value>>,
    /// Attendance punches.
    pub attendance: EngineResult<Vec<Value>>,
}

impl Default for DashboardInputs {
    fn default() -> Self {
        Self {
            employees: Ok(Vec::new()),
            leave_requests: Ok(Vec::new()),
            projects: Ok(Vec::new()),
            meeting_rooms: Ok(Vec::new()),
            payrolls: Ok(Vec::new()),
            attendance: Ok(Vec::new()),
        }
    }
}

impl DashboardInputs {
    /// Sets the fetch result of `collection`, returning the inputs.
    pub fn with(mut self, collection: Collection, result: EngineResult<Vec<Value>>) -> Self {
        *self.slot_mut(collection) = result;
        self
    }

    /// The fetch result of `collection`.
    pub fn get(&self, collection: Collection) -> &EngineResult<Vec<Value>> {
        match collection {
            Collection::Employees => &self.employees,
            Collection::LeaveRequests => &self.leave_requests,
            Collection::Projects => &self.projects,
            Collection::MeetingRooms => &self.meeting_rooms,
            Collection::Payrolls => &self.payrolls,
            Collection::Attendance => &self.attendance,
        }
    }

    fn slot_mut(&mut self, collection: Collection) -> &mut EngineResult<Vec<Value>> {
        match collection {
            Collection::Employees => &mut self.employees,
            Collection::LeaveRequests => &mut self.leave_requests,
            Collection::Projects => &mut self.projects,
            Collection::MeetingRooms => &mut self.meeting_rooms,
            Collection::Payrolls => &mut self.payrolls,
            Collection::Attendance => &mut self.attendance,
        }
    }

    /// Records of `collection`; empty if it failed to load.
    pub fn records(&self, collection: Collection) -> &[Value] {
        match self.get(collection) {
            Ok(records) => records,
            Err(_) => &[],
        }
    }

    /// Collections that failed to load, in fetch order.
    pub fn unavailable(&self) -> Vec<Collection> {
        Collection::ALL
            .into_iter()
            .filter(|collection| self.get(*collection).is_err())
            .collect()
    }
}

/// Counts employees per department key.
pub fn department_histogram(employees: &[EmployeeRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for employee in employees {
        *counts.entry(employee.department_key().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Counts employees per hire year.
pub fn hire_year_histogram(employees: &[EmployeeRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for employee in employees {
        *counts.entry(employee.hire_year_key()).or_insert(0) += 1;
    }
    counts
}

fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Mean of `salaries`; zero for an empty series.
///
/// A total too large for a decimal does not fail: each salary is divided
/// by the count before summing, and a result still out of range saturates
/// at [`Decimal::MAX`].
pub fn average_salary(salaries: &[Decimal]) -> Decimal {
    if salaries.is_empty() {
        return Decimal::ZERO;
    }
    let count = Decimal::from(salaries.len());
    match checked_sum(salaries.iter().copied()) {
        Some(total) => total / count,
        None => {
            warn!(
                employees = salaries.len(),
                "Salary total out of range, averaging scaled salaries"
            );
            checked_sum(salaries.iter().map(|salary| salary / count)).unwrap_or(Decimal::MAX)
        }
    }
}

/// Derives the overtime table from the latest-attendance table.
pub fn overtime_table(attendance: &[ResolvedAttendance], threshold: Decimal) -> Vec<OvertimeRow> {
    attendance
        .iter()
        .map(|row| OvertimeRow {
            employee_id: row.employee_id.clone(),
            total_hours: row.total_hours,
            overtime_hours: compute_overtime(row.total_hours, threshold),
        })
        .collect()
}

/// Builds the dashboard summary.
///
/// # Example
///
/// ```
/// use attendance_engine::config::EngineConfig;
/// use attendance_engine::dashboard::{aggregate, DashboardInputs};
/// use attendance_engine::source::Collection;
/// use serde_json::json;
///
/// let inputs = DashboardInputs::default().with(
///     Collection::Employees,
///     Ok(vec![json!({"department": "Eng"}), json!({"Department": "Eng"}), json!({"department": "Ops"})]),
/// );
/// let summary = aggregate(&inputs, &EngineConfig::default());
/// assert_eq!(summary.department_counts["Eng"], 2);
/// assert_eq!(summary.department_counts["Ops"], 1);
/// ```
pub fn aggregate(inputs: &DashboardInputs, config: &EngineConfig) -> DashboardSummary {
    let employees = EmployeeRecord::from_values(inputs.records(Collection::Employees));
    let salary_series: Vec<Decimal> = employees.iter().map(EmployeeRecord::salary_or_zero).collect();
    let department_counts = department_histogram(&employees);

    let projects = inputs.records(Collection::Projects);
    let active_project_count = projects
        .iter()
        .map(ProjectRecord::from_value)
        .filter(ProjectRecord::is_active)
        .count();

    let punches = AttendancePunch::from_values(inputs.records(Collection::Attendance));
    let attendance_table = resolve_attendance(&punches);
    let overtime_table = overtime_table(&attendance_table, config.daily_threshold_hours);

    DashboardSummary {
        employee_count: employees.len(),
        department_count: department_counts.len(),
        department_counts,
        hire_year_histogram: hire_year_histogram(&employees),
        average_salary: average_salary(&salary_series),
        salary_series,
        leave_count: inputs.records(Collection::LeaveRequests).len(),
        project_count: projects.len(),
        active_project_count,
        meeting_room_count: inputs.records(Collection::MeetingRooms).len(),
        payroll_count: inputs.records(Collection::Payrolls).len(),
        attendance_table,
        overtime_table,
        unavailable: inputs.unavailable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::Hours;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn unavailable(collection: Collection) -> EngineResult<Vec<Value>> {
        Err(EngineError::SourceUnavailable {
            collection,
            message: "connection refused".to_string(),
        })
    }

    fn full_inputs() -> DashboardInputs {
        DashboardInputs::default()
            .with(
                Collection::Employees,
                Ok(vec![
                    json!({"id": 1, "department": "Eng", "HireDate": "2021-04-01", "salary": 5000}),
                    json!({"id": 2, "Department": "Eng", "hireDate": "2022-01-10", "base_salary": "7000"}),
                    json!({"id": 3, "department": "Ops", "HireDate": "not a date", "BaseSalary": 6000}),
                    json!({"id": 4}),
                ]),
            )
            .with(Collection::LeaveRequests, Ok(vec![json!({}), json!({})]))
            .with(
                Collection::Projects,
                Ok(vec![
                    json!({"id": 1, "status": "Active"}),
                    json!({"id": 2, "status": "Completed"}),
                    json!({"id": 3, "status": "Active"}),
                    json!({"id": 4, "status": "active"}),
                ]),
            )
            .with(Collection::MeetingRooms, Ok(vec![json!({"name": "Atrium"})]))
            .with(Collection::Payrolls, Ok(vec![json!({}), json!({}), json!({})]))
            .with(
                Collection::Attendance,
                Ok(vec![
                    json!({"ID": 1, "EmployeeID": "e1", "EntryTime": "2024-03-15T09:00:00", "ExitTime": "2024-03-15T17:30:00"}),
                    json!({"ID": 2, "EmployeeID": "e1", "EntryTime": "2024-03-15T08:00:00", "ExitTime": "2024-03-15T16:00:00"}),
                    json!({"ID": 3, "EmployeeID": "e2", "EntryTime": "2024-03-15T07:00:00", "ExitTime": "2024-03-15T18:15:00"}),
                    json!({"ID": 4, "EmployeeID": "e3", "EntryTime": "2024-03-15T10:00:00"}),
                ]),
            )
    }

    #[test]
    fn test_department_variants_merge() {
        let summary = aggregate(&full_inputs(), &EngineConfig::default());
        assert_eq!(summary.department_counts["Eng"], 2);
        assert_eq!(summary.department_counts["Ops"], 1);
        assert_eq!(summary.department_counts["unknown"], 1);
        assert_eq!(summary.department_count, 3);
    }

    #[test]
    fn test_hire_year_histogram() {
        let summary = aggregate(&full_inputs(), &EngineConfig::default());
        assert_eq!(summary.hire_year_histogram["2021"], 1);
        assert_eq!(summary.hire_year_histogram["2022"], 1);
        assert_eq!(summary.hire_year_histogram["unknown"], 2);
    }

    #[test]
    fn test_salary_series_and_average() {
        let summary = aggregate(&full_inputs(), &EngineConfig::default());
        assert_eq!(
            summary.salary_series,
            vec![dec("5000"), dec("7000"), dec("6000"), Decimal::ZERO]
        );
        assert_eq!(summary.average_salary, dec("4500"));
    }

    #[test]
    fn test_average_salary_of_no_employees_is_zero() {
        let summary = aggregate(&DashboardInputs::default(), &EngineConfig::default());
        assert_eq!(summary.employee_count, 0);
        assert_eq!(summary.average_salary, Decimal::ZERO);
        assert!(summary.salary_series.is_empty());
    }

    #[test]
    fn test_average_salary_survives_overflowing_total() {
        let max = Decimal::MAX.to_string();
        let inputs = DashboardInputs::default().with(
            Collection::Employees,
            Ok(vec![json!({"salary": max}), json!({"salary": max})]),
        );

        let summary = aggregate(&inputs, &EngineConfig::default());
        assert_eq!(summary.salary_series, vec![Decimal::MAX, Decimal::MAX]);
        assert!(summary.average_salary >= Decimal::MAX - Decimal::ONE);
    }

    #[test]
    fn test_average_salary_scaled_fallback() {
        let big = Decimal::MAX - Decimal::from(1000);
        let average = average_salary(&[big, big, Decimal::ZERO, Decimal::ZERO]);
        assert!(average > dec("39614081257132168796771974000"));
        assert!(average < dec("39614081257132168796771976000"));
    }

    #[test]
    fn test_headline_counts() {
        let summary = aggregate(&full_inputs(), &EngineConfig::default());
        assert_eq!(summary.employee_count, 4);
        assert_eq!(summary.leave_count, 2);
        assert_eq!(summary.project_count, 4);
        assert_eq!(summary.active_project_count, 2);
        assert_eq!(summary.meeting_room_count, 1);
        assert_eq!(summary.payroll_count, 3);
        assert!(summary.is_complete());
    }

    #[test]
    fn test_attendance_and_overtime_tables() {
        let summary = aggregate(&full_inputs(), &EngineConfig::default());

        let hours: Vec<(&str, Hours)> = summary
            .attendance_table
            .iter()
            .map(|row| (row.employee_id.as_str(), row.total_hours))
            .collect();
        assert_eq!(
            hours,
            vec![
                ("e1", Hours::Known(dec("8.50"))),
                ("e2", Hours::Known(dec("11.25"))),
                ("e3", Hours::Unknown),
            ]
        );

        let overtime: Vec<Hours> = summary.overtime_table.iter().map(|r| r.overtime_hours).collect();
        assert_eq!(
            overtime,
            vec![Hours::Known(dec("0.50")), Hours::Known(dec("3.25")), Hours::Unknown]
        );
    }

    #[test]
    fn test_overtime_uses_configured_threshold() {
        let config = EngineConfig {
            daily_threshold_hours: dec("7.5"),
            ..EngineConfig::default()
        };
        let summary = aggregate(&full_inputs(), &config);
        assert_eq!(summary.overtime_table[0].overtime_hours, Hours::Known(dec("1.00")));
    }

    #[test]
    fn test_failed_collection_only_degrades_its_own_figures() {
        let inputs = full_inputs()
            .with(Collection::Projects, unavailable(Collection::Projects))
            .with(Collection::Attendance, unavailable(Collection::Attendance));

        let summary = aggregate(&inputs, &EngineConfig::default());
        assert_eq!(summary.project_count, 0);
        assert_eq!(summary.active_project_count, 0);
        assert!(summary.attendance_table.is_empty());
        assert!(summary.overtime_table.is_empty());
        assert_eq!(summary.employee_count, 4);
        assert_eq!(summary.payroll_count, 3);
        assert_eq!(
            summary.unavailable,
            vec![Collection::Projects, Collection::Attendance]
        );
        assert!(!summary.is_complete());
    }

    #[test]
    fn test_inputs_accessors() {
        let inputs = DashboardInputs::default()
            .with(Collection::Payrolls, unavailable(Collection::Payrolls))
            .with(Collection::MeetingRooms, Ok(vec![json!({})]));
        assert!(inputs.get(Collection::Payrolls).is_err());
        assert!(inputs.records(Collection::Payrolls).is_empty());
        assert_eq!(inputs.records(Collection::MeetingRooms).len(), 1);
        assert_eq!(inputs.unavailable(), vec![Collection::Payrolls]);
    }
}
