//! Field-resolution tables for raw record-store JSON.
//!
//! The record store is inconsistent about field naming (`Department` vs
//! `department`, `salary` vs `base_salary` vs `BaseSalary`). Each logical
//! field is described once by a [`FieldResolver`] listing its candidate
//! source names in priority order, and records are normalized through these
//! tables at the boundary so the rest of the engine only sees typed fields.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Bucket key used when a grouping field is absent or unparseable.
pub const UNKNOWN: &str = "unknown";

/// An ordered list of candidate source names for one logical field.
///
/// # Example
///
/// ```
/// use attendance_engine::models::fields::DEPARTMENT;
/// use serde_json::json;
///
/// let record = json!({"department": "Eng"});
/// assert_eq!(DEPARTMENT.resolve(&record), Some(&json!("Eng")));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldResolver {
    /// The logical (normalized) field name.
    pub name: &'static str,
    /// Source field names, highest priority first.
    pub candidates: &'static [&'static str],
}

impl FieldResolver {
    /// Creates a resolver for `name` over `candidates`.
    pub const fn new(name: &'static str, candidates: &'static [&'static str]) -> Self {
        Self { name, candidates }
    }

    /// Returns the first candidate value that is present.
    ///
    /// `null` and empty strings count as absent.
    pub fn resolve<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.candidates
            .iter()
            .filter_map(|key| record.get(key))
            .find(|value| is_present(value))
    }

    /// Returns the first candidate value that `parse` accepts.
    pub fn resolve_with<T>(&self, record: &Value, parse: impl Fn(&Value) -> Option<T>) -> Option<T> {
        self.candidates
            .iter()
            .filter_map(|key| record.get(key))
            .filter(|value| is_present(value))
            .find_map(parse)
    }

    /// Resolves the field as a display string.
    pub fn resolve_string(&self, record: &Value) -> Option<String> {
        self.resolve_with(record, value_to_string)
    }

    /// Resolves the field as a decimal number.
    pub fn resolve_decimal(&self, record: &Value) -> Option<Decimal> {
        self.resolve_with(record, value_to_decimal)
    }
}

/// Punch identifier.
pub const PUNCH_ID: FieldResolver = FieldResolver::new("id", &["id", "ID"]);
/// Employee a punch belongs to.
pub const PUNCH_EMPLOYEE_ID: FieldResolver =
    FieldResolver::new("employee_id", &["employeeId", "EmployeeID", "employee_id"]);
/// Clock-in time.
pub const ENTRY_TIME: FieldResolver =
    FieldResolver::new("entry_time", &["entryTime", "EntryTime", "entry_time"]);
/// Clock-out time.
pub const EXIT_TIME: FieldResolver =
    FieldResolver::new("exit_time", &["exitTime", "ExitTime", "exit_time"]);

/// Employee identifier.
pub const EMPLOYEE_ID: FieldResolver = FieldResolver::new("id", &["id", "ID", "EmployeeID"]);
/// Employee department.
pub const DEPARTMENT: FieldResolver = FieldResolver::new("department", &["Department", "department"]);
/// Employee hire date.
pub const HIRE_DATE: FieldResolver = FieldResolver::new("hire_date", &["HireDate", "hireDate"]);
/// Employee base salary.
pub const SALARY: FieldResolver =
    FieldResolver::new("salary", &["salary", "base_salary", "BaseSalary"]);

/// Project identifier.
pub const PROJECT_ID: FieldResolver = FieldResolver::new("id", &["id", "ID", "ProjectID"]);
/// Project status.
pub const PROJECT_STATUS: FieldResolver = FieldResolver::new("status", &["status", "Status"]);

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Stringifies scalar JSON values; arrays and objects yield `None`.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parses a JSON number or numeric string as a decimal.
///
/// # Example
///
/// ```
/// use attendance_engine::models::fields::value_to_decimal;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// assert_eq!(value_to_decimal(&json!("16000")), Some(Decimal::from(16000)));
/// assert_eq!(value_to_decimal(&json!(1.5)), Some(Decimal::new(15, 1)));
/// assert_eq!(value_to_decimal(&json!("n/a")), None);
/// ```
pub fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_department_prefers_capitalized_variant() {
        let record = json!({"Department": "Ops", "department": "Eng"});
        assert_eq!(DEPARTMENT.resolve_string(&record), Some("Ops".to_string()));
    }

    #[test]
    fn test_department_falls_back_to_lowercase_variant() {
        let record = json!({"department": "Eng"});
        assert_eq!(DEPARTMENT.resolve_string(&record), Some("Eng".to_string()));
    }

    #[test]
    fn test_null_and_empty_values_are_absent() {
        let record = json!({"Department": null, "department": "  "});
        assert_eq!(DEPARTMENT.resolve(&record), None);

        let record = json!({"Department": "", "department": "Eng"});
        assert_eq!(DEPARTMENT.resolve_string(&record), Some("Eng".to_string()));
    }

    #[test]
    fn test_salary_priority_order() {
        let record = json!({"BaseSalary": 3, "base_salary": 2, "salary": 1});
        assert_eq!(SALARY.resolve_decimal(&record), Some(Decimal::from(1)));

        let record = json!({"BaseSalary": 3, "base_salary": 2});
        assert_eq!(SALARY.resolve_decimal(&record), Some(Decimal::from(2)));
    }

    #[test]
    fn test_salary_skips_candidates_that_do_not_parse() {
        let record = json!({"salary": "tbd", "BaseSalary": "4500.50"});
        assert_eq!(SALARY.resolve_decimal(&record), Some(Decimal::new(450050, 2)));
    }

    #[test]
    fn test_salary_none_when_no_candidate_parses() {
        let record = json!({"salary": "tbd", "base_salary": [1, 2]});
        assert_eq!(SALARY.resolve_decimal(&record), None);
    }

    #[test]
    fn test_numeric_ids_are_stringified() {
        let record = json!({"EmployeeID": 42});
        assert_eq!(PUNCH_EMPLOYEE_ID.resolve_string(&record), Some("42".to_string()));
    }

    #[test]
    fn test_scientific_notation_parses() {
        assert_eq!(value_to_decimal(&json!("1.6e4")), Some(Decimal::from(16000)));
    }

    #[test]
    fn test_non_scalar_values_do_not_stringify() {
        assert_eq!(value_to_string(&json!({"a": 1})), None);
        assert_eq!(value_to_string(&json!([1])), None);
    }
}
