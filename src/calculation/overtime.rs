//! Overtime and compensation calculations.
//!
//! This module derives overtime hours from worked hours and computes the
//! monthly compensation figures of the salary calculator: hourly rate from
//! a monthly base salary, overtime pay at a multiplier, and the total.
//! Invalid inputs are rejected with a validation error naming the field;
//! nothing is silently clamped.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendancePunch, AuditStep, Hours, round_hours};

use super::time_window::is_specific_month;

/// Default daily overtime threshold in hours.
pub const DEFAULT_DAILY_THRESHOLD: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Default number of working hours in a month.
pub const DEFAULT_STANDARD_MONTHLY_HOURS: Decimal = Decimal::from_parts(160, 0, 0, false, 0);

/// Default overtime multiplier (time and a half).
pub const DEFAULT_OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Converts a floating-point input to a decimal, rejecting NaN and infinities.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::decimal_from_f64;
///
/// assert!(decimal_from_f64("overtime_hours", 2.5).is_ok());
/// assert!(decimal_from_f64("overtime_hours", f64::NAN).is_err());
/// ```
pub fn decimal_from_f64(field: &str, value: f64) -> EngineResult<Decimal> {
    if !value.is_finite() {
        return Err(EngineError::validation(
            field,
            format!("must be a finite number, got {}", value),
        ));
    }
    Decimal::try_from(value).map_err(|e| EngineError::validation(field, e.to_string()))
}

fn ensure_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::validation(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(())
}

fn out_of_range(field: &str) -> EngineError {
    EngineError::validation(field, "result is out of range")
}

/// Computes the hours worked beyond `threshold`.
///
/// Returns `max(0, total_hours - threshold)` rounded to two decimals.
/// Unknown hours stay unknown.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{compute_overtime, DEFAULT_DAILY_THRESHOLD};
/// use attendance_engine::models::Hours;
/// use rust_decimal::Decimal;
///
/// let overtime = compute_overtime(Hours::Known(Decimal::new(85, 1)), DEFAULT_DAILY_THRESHOLD);
/// assert_eq!(overtime, Hours::Known(Decimal::new(5, 1)));
/// assert_eq!(compute_overtime(Hours::Unknown, DEFAULT_DAILY_THRESHOLD), Hours::Unknown);
/// ```
pub fn compute_overtime(total_hours: Hours, threshold: Decimal) -> Hours {
    match total_hours {
        Hours::Known(hours) if hours > threshold => Hours::from_decimal(hours - threshold),
        Hours::Known(_) => Hours::Known(Decimal::ZERO),
        Hours::Unknown => Hours::Unknown,
    }
}

/// Derives an hourly rate from a monthly base salary.
///
/// # Errors
///
/// `ValidationError` if `base_salary` is negative,
/// `standard_monthly_hours` is not positive, or the rate is out of range.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::compute_hourly_rate;
/// use rust_decimal::Decimal;
///
/// let rate = compute_hourly_rate(Decimal::from(16000), Decimal::from(160)).unwrap();
/// assert_eq!(rate, Decimal::from(100));
/// ```
pub fn compute_hourly_rate(
    base_salary: Decimal,
    standard_monthly_hours: Decimal,
) -> EngineResult<Decimal> {
    ensure_non_negative("base_salary", base_salary)?;
    if standard_monthly_hours <= Decimal::ZERO {
        return Err(EngineError::validation(
            "standard_monthly_hours",
            format!("must be positive, got {}", standard_monthly_hours),
        ));
    }
    base_salary
        .checked_div(standard_monthly_hours)
        .ok_or_else(|| out_of_range("hourly_rate"))
}

/// Computes pay for overtime hours at `hourly_rate * multiplier`.
///
/// # Errors
///
/// `ValidationError` if any input is negative or the pay is out of range.
pub fn compute_overtime_pay(
    hourly_rate: Decimal,
    overtime_multiplier: Decimal,
    overtime_hours: Decimal,
) -> EngineResult<Decimal> {
    ensure_non_negative("hourly_rate", hourly_rate)?;
    ensure_non_negative("overtime_multiplier", overtime_multiplier)?;
    ensure_non_negative("overtime_hours", overtime_hours)?;
    hourly_rate
        .checked_mul(overtime_multiplier)
        .and_then(|rate| rate.checked_mul(overtime_hours))
        .ok_or_else(|| out_of_range("overtime_pay"))
}

/// Adds overtime pay to the base salary.
///
/// # Errors
///
/// `ValidationError` if either input is negative or the total is out of
/// range.
pub fn compute_total_compensation(
    base_salary: Decimal,
    overtime_pay: Decimal,
) -> EngineResult<Decimal> {
    ensure_non_negative("base_salary", base_salary)?;
    ensure_non_negative("overtime_pay", overtime_pay)?;
    base_salary
        .checked_add(overtime_pay)
        .ok_or_else(|| out_of_range("total_compensation"))
}

/// Input to the salary calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryInput {
    /// The employee being paid.
    pub employee_id: String,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Overtime hours worked in the month.
    pub overtime_hours: Decimal,
}

impl SalaryInput {
    /// Builds an input from floating-point figures, rejecting non-finite values.
    pub fn from_f64(
        employee_id: impl Into<String>,
        base_salary: f64,
        overtime_hours: f64,
    ) -> EngineResult<Self> {
        Ok(Self {
            employee_id: employee_id.into(),
            base_salary: decimal_from_f64("base_salary", base_salary)?,
            overtime_hours: decimal_from_f64("overtime_hours", overtime_hours)?,
        })
    }
}

/// The salary calculator's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// The employee being paid.
    pub employee_id: String,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Base salary divided by the standard monthly hours.
    pub hourly_rate: Decimal,
    /// Hourly rate times the overtime multiplier.
    pub overtime_rate: Decimal,
    /// Overtime hours paid.
    pub overtime_hours: Decimal,
    /// Overtime rate times overtime hours.
    pub overtime_pay: Decimal,
    /// Base salary plus overtime pay.
    pub total_compensation: Decimal,
    /// How each figure was reached.
    pub audit_steps: Vec<AuditStep>,
}

/// Computes the monthly compensation for one employee.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{calculate_salary, SalaryInput};
/// use attendance_engine::config::EngineConfig;
/// use rust_decimal::Decimal;
///
/// let input = SalaryInput {
///     employee_id: "e1".to_string(),
///     base_salary: Decimal::from(16000),
///     overtime_hours: Decimal::from(10),
/// };
/// let breakdown = calculate_salary(&input, &EngineConfig::default()).unwrap();
/// assert_eq!(breakdown.overtime_pay, Decimal::from(1500));
/// assert_eq!(breakdown.total_compensation, Decimal::from(17500));
/// ```
pub fn calculate_salary(input: &SalaryInput, config: &EngineConfig) -> EngineResult<SalaryBreakdown> {
    let hourly_rate = compute_hourly_rate(input.base_salary, config.standard_monthly_hours)?;
    let overtime_rate = hourly_rate
        .checked_mul(config.overtime_multiplier)
        .ok_or_else(|| out_of_range("overtime_rate"))?;
    let overtime_pay =
        compute_overtime_pay(hourly_rate, config.overtime_multiplier, input.overtime_hours)?;
    let total_compensation = compute_total_compensation(input.base_salary, overtime_pay)?;

    debug!(
        employee_id = %input.employee_id,
        hourly_rate = %hourly_rate,
        overtime_pay = %overtime_pay,
        total = %total_compensation,
        "Salary calculated"
    );

    let audit_steps = vec![
        AuditStep {
            step_number: 1,
            rule_id: "hourly_rate".to_string(),
            rule_name: "Hourly Rate".to_string(),
            input: serde_json::json!({
                "base_salary": input.base_salary.normalize().to_string(),
                "standard_monthly_hours": config.standard_monthly_hours.normalize().to_string()
            }),
            output: serde_json::json!({ "hourly_rate": hourly_rate.normalize().to_string() }),
            reasoning: format!(
                "{} base salary over {} standard hours",
                input.base_salary.normalize(),
                config.standard_monthly_hours.normalize()
            ),
        },
        AuditStep {
            step_number: 2,
            rule_id: "overtime_pay".to_string(),
            rule_name: "Overtime Pay".to_string(),
            input: serde_json::json!({
                "hourly_rate": hourly_rate.normalize().to_string(),
                "multiplier": config.overtime_multiplier.normalize().to_string(),
                "overtime_hours": input.overtime_hours.normalize().to_string()
            }),
            output: serde_json::json!({ "overtime_pay": overtime_pay.normalize().to_string() }),
            reasoning: format!(
                "{} overtime hours at {}x the hourly rate",
                input.overtime_hours.normalize(),
                config.overtime_multiplier.normalize()
            ),
        },
        AuditStep {
            step_number: 3,
            rule_id: "total_compensation".to_string(),
            rule_name: "Total Compensation".to_string(),
            input: serde_json::json!({
                "base_salary": input.base_salary.normalize().to_string(),
                "overtime_pay": overtime_pay.normalize().to_string()
            }),
            output: serde_json::json!({
                "total_compensation": total_compensation.normalize().to_string()
            }),
            reasoning: "Base salary plus overtime pay".to_string(),
        },
    ];

    Ok(SalaryBreakdown {
        employee_id: input.employee_id.clone(),
        base_salary: input.base_salary,
        hourly_rate,
        overtime_rate,
        overtime_hours: input.overtime_hours,
        overtime_pay,
        total_compensation,
        audit_steps,
    })
}

/// Sums one employee's daily overtime over a zero-based month of a year.
///
/// Each punch entered in the month contributes its hours beyond
/// `threshold`; punches with unknown duration contribute nothing.
pub fn monthly_overtime_hours(
    punches: &[AttendancePunch],
    employee_id: &str,
    month: u32,
    year: i32,
    threshold: Decimal,
) -> Decimal {
    let total: Decimal = punches
        .iter()
        .filter(|p| p.employee_id == employee_id)
        .filter(|p| p.entry_time.is_some_and(|t| is_specific_month(t, month, year)))
        .filter_map(|p| compute_overtime(p.total_hours(), threshold).known())
        .sum();
    round_hours(total)
}
