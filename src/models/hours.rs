//! Hour quantities with an explicit "unknown" state.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A number of hours, or the "unknown" sentinel.
///
/// Durations are unknown when a punch is still open or one of its
/// timestamps failed to parse. Unknown is never coerced to zero.
///
/// Serializes as a two-decimal string (`"8.50"`) or `"unknown"`.
///
/// # Example
///
/// ```
/// use attendance_engine::models::Hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(Hours::from_decimal(Decimal::new(85, 1)).to_string(), "8.50");
/// assert_eq!(Hours::Unknown.to_string(), "unknown");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Hours {
    /// A known number of hours, rounded to two decimal places.
    Known(Decimal),
    /// The duration could not be determined.
    Unknown,
}

impl Hours {
    /// Creates a known value, rounded to two decimals.
    pub fn from_decimal(hours: Decimal) -> Self {
        Hours::Known(round_hours(hours))
    }

    /// Returns the hours if known.
    pub fn known(self) -> Option<Decimal> {
        match self {
            Hours::Known(h) => Some(h),
            Hours::Unknown => None,
        }
    }

    /// Returns true for the unknown sentinel.
    pub fn is_unknown(self) -> bool {
        matches!(self, Hours::Unknown)
    }
}

/// Rounds to two decimal places, halves away from zero.
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hours::Known(h) => {
                let mut fixed = round_hours(*h);
                fixed.rescale(2);
                write!(f, "{}", fixed)
            }
            Hours::Unknown => f.write_str(super::fields::UNKNOWN),
        }
    }
}

impl From<Hours> for String {
    fn from(hours: Hours) -> Self {
        hours.to_string()
    }
}

impl TryFrom<String> for Hours {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == super::fields::UNKNOWN {
            return Ok(Hours::Unknown);
        }
        Decimal::from_str(&value)
            .map(Hours::from_decimal)
            .map_err(|e| format!("invalid hours '{}': {}", value, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(round_hours(dec("1.005")), dec("1.01"));
        assert_eq!(round_hours(dec("1.004")), dec("1.00"));
        assert_eq!(round_hours(dec("-1.005")), dec("-1.01"));
    }

    #[test]
    fn test_display_always_two_decimals() {
        assert_eq!(Hours::from_decimal(dec("8")).to_string(), "8.00");
        assert_eq!(Hours::from_decimal(dec("0.5")).to_string(), "0.50");
        assert_eq!(Hours::from_decimal(dec("7.999")).to_string(), "8.00");
    }

    #[test]
    fn test_known_and_unknown_accessors() {
        assert_eq!(Hours::from_decimal(dec("2.25")).known(), Some(dec("2.25")));
        assert_eq!(Hours::Unknown.known(), None);
        assert!(Hours::Unknown.is_unknown());
    }

    #[test]
    fn test_serializes_as_strings() {
        assert_eq!(
            serde_json::to_string(&Hours::from_decimal(dec("8.5"))).unwrap(),
            "\"8.50\""
        );
        assert_eq!(serde_json::to_string(&Hours::Unknown).unwrap(), "\"unknown\"");
    }

    #[test]
    fn test_deserializes_sentinel_and_numbers() {
        let unknown: Hours = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(unknown, Hours::Unknown);

        let known: Hours = serde_json::from_str("\"3.75\"").unwrap();
        assert_eq!(known, Hours::Known(dec("3.75")));

        assert!(serde_json::from_str::<Hours>("\"lots\"").is_err());
    }
}
