//! Time-window filters.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Which time window a query selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// Every record, regardless of timestamp.
    #[default]
    All,
    /// Records on the current calendar day.
    Today,
    /// Records in the current calendar week.
    ThisWeek,
    /// Records in a given month of a given year.
    SpecificMonth,
    /// Records in a given year.
    SpecificYear,
}

/// A time-window filter.
///
/// `SpecificMonth` uses `month` (zero-based, 0 = January) and `year`;
/// `SpecificYear` uses only `year`. A missing month or year matches every
/// month or year rather than failing, and `SpecificYear` ignores any
/// `month` left over from a monthly query.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{FilterSpec, WindowKind};
///
/// let march_2024 = FilterSpec::month(2, 2024);
/// assert_eq!(march_2024.window, WindowKind::SpecificMonth);
/// assert!(march_2024.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    /// The window kind.
    pub window: WindowKind,
    /// Zero-based month for `SpecificMonth`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    /// Calendar year for `SpecificMonth` and `SpecificYear`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl FilterSpec {
    /// Matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches the current day.
    pub fn today() -> Self {
        Self {
            window: WindowKind::Today,
            ..Self::default()
        }
    }

    /// Matches the current week.
    pub fn this_week() -> Self {
        Self {
            window: WindowKind::ThisWeek,
            ..Self::default()
        }
    }

    /// Matches a zero-based month of a year.
    pub fn month(month: u32, year: i32) -> Self {
        Self {
            window: WindowKind::SpecificMonth,
            month: Some(month),
            year: Some(year),
        }
    }

    /// Matches a year.
    pub fn year(year: i32) -> Self {
        Self {
            window: WindowKind::SpecificYear,
            month: None,
            year: Some(year),
        }
    }

    /// Checks that the month index is in range.
    ///
    /// The pipeline never calls this: an out-of-range month there simply
    /// matches nothing. Callers that want to reject bad input up front can.
    pub fn validate(&self) -> EngineResult<()> {
        match self.month {
            Some(month) if month > 11 => Err(EngineError::validation(
                "month",
                format!("month index {} is outside 0-11", month),
            )),
            _ => Ok(()),
        }
    }
}
