//! Error types for the Attendance Analytics Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while normalizing records,
//! computing overtime, or aggregating dashboard data.

use thiserror::Error;

use crate::source::Collection;

/// The main error type for the Attendance Analytics Engine.
///
/// All fallible operations in the engine return this error type. Note that
/// only [`EngineError::ValidationError`] and the configuration variants are
/// ever returned to a caller as a hard failure; parse errors and unavailable
/// sources are absorbed at the boundary and degrade to "unknown" or empty
/// values.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::ValidationError {
///     field: "base_salary".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid value for 'base_salary': must not be negative");
/// ```
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A timestamp or date could not be parsed.
    #[error("Failed to parse timestamp '{value}': {message}")]
    ParseError {
        /// The raw value that failed to parse.
        value: String,
        /// A description of the parse failure.
        message: String,
    },

    /// A numeric input was negative, non-finite, or otherwise unusable.
    #[error("Invalid value for '{field}': {message}")]
    ValidationError {
        /// The name of the offending field.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// A record collection could not be fetched from the record store.
    #[error("Collection '{collection}' is unavailable: {message}")]
    SourceUnavailable {
        /// The collection that failed to load.
        collection: Collection,
        /// A description of the fetch failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::ValidationError`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_parse_error_displays_value() {
        let error = EngineError::ParseError {
            value: "yesterday-ish".to_string(),
            message: "unrecognized timestamp format".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse timestamp 'yesterday-ish': unrecognized timestamp format"
        );
    }

    #[test]
    fn test_validation_error_names_field() {
        let error = EngineError::validation("overtime_hours", "must not be negative");
        assert_eq!(
            error.to_string(),
            "Invalid value for 'overtime_hours': must not be negative"
        );
    }

    #[test]
    fn test_source_unavailable_displays_collection() {
        let error = EngineError::SourceUnavailable {
            collection: Collection::Payrolls,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Collection 'payrolls' is unavailable: connection refused"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_validation_error() -> EngineResult<()> {
            Err(EngineError::validation("base_salary", "must be finite"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_validation_error()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
