//! Calculation logic for the Attendance Analytics Engine.
//!
//! This module contains the time-window predicates used by every filter,
//! timestamp parsing and display formatting, latest-punch resolution, and
//! the overtime and compensation calculations.

mod overtime;
mod punch_resolver;
mod time_window;

pub use overtime::{
    DEFAULT_DAILY_THRESHOLD, DEFAULT_OVERTIME_MULTIPLIER, DEFAULT_STANDARD_MONTHLY_HOURS,
    SalaryBreakdown, SalaryInput, calculate_salary, compute_hourly_rate, compute_overtime,
    compute_overtime_pay, compute_total_compensation, decimal_from_f64, monthly_overtime_hours,
};
pub use punch_resolver::{latest_punches, punch_duration, punch_duration_in, resolve_attendance};
pub use time_window::{
    DISPLAY_FORMAT, TimeWindow, WeekRange, format_timestamp, is_specific_month, is_specific_year,
    is_this_week, is_today, local_now, parse_timestamp, parse_timestamp_value,
};
