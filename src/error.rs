//! Error types for the budget engine.
//!
//! Calculations themselves never fail: malformed input is normalized to zero
//! before it reaches the engine. Errors only arise while loading or
//! validating the rate and category schedules the engine is configured with.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the budget engine.
///
/// # Example
///
/// ```
/// use budget_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
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

    /// A bracket, contribution or category table violates its invariants.
    #[error("Invalid schedule table '{table}': {message}")]
    InvalidSchedule {
        /// The table that failed validation (e.g. "tax_brackets").
        table: String,
        /// A description of the violated invariant.
        message: String,
    },

    /// No schedule version is effective on the requested date.
    #[error("No schedule effective on {date}")]
    ScheduleNotFound {
        /// The date for which a schedule was requested.
        date: NaiveDate,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidSchedule`].
    pub fn invalid_schedule(table: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidSchedule {
            table: table.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
