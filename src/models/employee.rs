//! Employee and project models.
//!
//! This module defines the read-only views of employee and project records
//! that the dashboard aggregates over. Both are normalized from raw JSON
//! through the field-resolution tables, so naming variants in the record
//! store (`Department`/`department`, `salary`/`base_salary`/`BaseSalary`)
//! are merged before any aggregation sees them.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculation::parse_timestamp_value;

use super::fields::{self, UNKNOWN};

/// An employee as seen by the analytics engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique identifier for the employee.
    pub id: String,
    /// Department name, if recorded.
    pub department: Option<String>,
    /// Hire date, if recorded and parseable.
    pub hire_date: Option<NaiveDate>,
    /// Monthly base salary, if any salary field parses as a number.
    pub base_salary: Option<Decimal>,
}

impl EmployeeRecord {
    /// Normalizes one raw employee record.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::models::EmployeeRecord;
    /// use rust_decimal::Decimal;
    /// use serde_json::json;
    ///
    /// let employee = EmployeeRecord::from_value(&json!({
    ///     "id": 7,
    ///     "Department": "Eng",
    ///     "HireDate": "2021-04-01",
    ///     "BaseSalary": "16000"
    /// }));
    /// assert_eq!(employee.department_key(), "Eng");
    /// assert_eq!(employee.hire_year_key(), "2021");
    /// assert_eq!(employee.salary_or_zero(), Decimal::from(16000));
    /// ```
    pub fn from_value(record: &Value) -> Self {
        Self {
            id: fields::EMPLOYEE_ID
                .resolve_string(record)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            department: fields::DEPARTMENT.resolve_string(record),
            hire_date: fields::HIRE_DATE
                .resolve_with(record, |value| parse_timestamp_value(value).ok())
                .map(|timestamp| timestamp.date()),
            base_salary: fields::SALARY.resolve_decimal(record),
        }
    }

    /// Normalizes a batch of raw records, preserving order.
    pub fn from_values(records: &[Value]) -> Vec<Self> {
        records.iter().map(Self::from_value).collect()
    }

    /// Department histogram key; `"unknown"` when absent.
    pub fn department_key(&self) -> &str {
        self.department.as_deref().unwrap_or(UNKNOWN)
    }

    /// Hire-year histogram key; `"unknown"` when absent or unparseable.
    pub fn hire_year_key(&self) -> String {
        self.hire_date
            .map(|date| date.year().to_string())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Salary for the salary series.
    ///
    /// Zero when no salary field parses: this is a deliberate default that
    /// keeps the employee in the series and the average, not an error.
    pub fn salary_or_zero(&self) -> Decimal {
        self.base_salary.unwrap_or(Decimal::ZERO)
    }
}

/// A project as seen by the analytics engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Unique identifier for the project.
    pub id: String,
    /// Lifecycle status (e.g. "Active", "Completed").
    pub status: Option<String>,
}

impl ProjectRecord {
    /// Status value that marks a project as active.
    pub const ACTIVE_STATUS: &'static str = "Active";

    /// Normalizes one raw project record.
    pub fn from_value(record: &Value) -> Self {
        Self {
            id: fields::PROJECT_ID
                .resolve_string(record)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            status: fields::PROJECT_STATUS.resolve_string(record),
        }
    }

    /// Returns true if the project's status is exactly "Active".
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(Self::ACTIVE_STATUS)
    }
}
