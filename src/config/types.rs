//! Configuration types for the analytics engine.
//!
//! This module contains the strongly-typed configuration structure that is
//! deserialized from the engine's YAML configuration file.

use std::time::Duration;

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tunable parameters of the engine.
///
/// Every field has a default, so a configuration file only needs to name
/// the values it overrides.
///
/// # Example
///
/// ```
/// use attendance_engine::config::EngineConfig;
/// use rust_decimal::Decimal;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.daily_threshold_hours, Decimal::from(8));
/// assert_eq!(config.refresh_interval().as_secs(), 600);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hours per day after which worked time counts as overtime.
    pub daily_threshold_hours: Decimal,
    /// Working hours per month used to derive an hourly rate.
    pub standard_monthly_hours: Decimal,
    /// Multiplier applied to the hourly rate for overtime hours.
    pub overtime_multiplier: Decimal,
    /// Period of the dashboard refresh loop, in seconds.
    pub refresh_interval_secs: u64,
    /// Longest wait for one collection fetch, in seconds.
    pub fetch_timeout_secs: u64,
    /// Rows per page on the attendance list.
    pub default_page_size: usize,
    /// First day of the calendar week.
    pub week_start: Weekday,
    /// Label callers pass to the timestamp display helpers
    /// (`entry_display`, `exit_display`) for missing timestamps.
    ///
    /// Unknown durations and histogram buckets always use `"unknown"`.
    pub unknown_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            daily_threshold_hours: Decimal::from(8),
            standard_monthly_hours: Decimal::from(160),
            overtime_multiplier: Decimal::new(15, 1),
            refresh_interval_secs: 600,
            fetch_timeout_secs: 30,
            default_page_size: 5,
            week_start: Weekday::Sun,
            unknown_label: "unknown".to_string(),
        }
    }
}

impl EngineConfig {
    /// Returns the refresh period as a [`Duration`].
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Returns the per-collection fetch timeout as a [`Duration`].
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.daily_threshold_hours, Decimal::from(8));
        assert_eq!(config.standard_monthly_hours, Decimal::from(160));
        assert_eq!(config.overtime_multiplier, Decimal::new(15, 1));
        assert_eq!(config.refresh_interval(), Duration::from_secs(10 * 60));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.default_page_size, 5);
        assert_eq!(config.week_start, Weekday::Sun);
        assert_eq!(config.unknown_label, "unknown");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: EngineConfig = serde_yaml::from_str("daily_threshold_hours: 7.5\n").unwrap();
        assert_eq!(config.daily_threshold_hours, Decimal::new(75, 1));
        assert_eq!(config.standard_monthly_hours, Decimal::from(160));
        assert_eq!(config.week_start, Weekday::Sun);
    }

    #[test]
    fn test_week_start_accepts_day_names() {
        let config: EngineConfig = serde_yaml::from_str("week_start: Mon\n").unwrap();
        assert_eq!(config.week_start, Weekday::Mon);
    }
}
