//! Errors for run-input validation (window dates and fit parameters).
//!
//! This module defines [`InputError`], covering every way user-supplied run
//! configuration can be unusable: dates that do not parse day-first, windows
//! out of chronological order, numeric text that does not parse, and
//! parameter values outside their admissible range. Implements
//! `Display`/`Error`.
//!
//! ## Conventions
//! - Every variant names the offending *field* with the same phrasing the
//!   interactive prompts use, so messages read naturally either way.
//! - Validation is eager: these errors surface at construction time, before
//!   any data is loaded or any optimizer step runs.
use chrono::NaiveDate;

/// Result alias for input-validation operations that may produce
/// [`InputError`].
pub type InputResult<T> = Result<T, InputError>;

/// Unified error type for window and fit-parameter validation.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    // ---- Dates ----
    /// A date string failed day-first (`dd/mm/yyyy`) parsing.
    DateFormat { field: &'static str, text: String },

    /// The four window dates are not strictly increasing.
    DateOrder {
        training_start: NaiveDate,
        training_end: NaiveDate,
        test_start: NaiveDate,
        test_end: NaiveDate,
    },

    // ---- Numeric parameters ----
    /// A numeric parameter string failed to parse.
    NumberFormat { field: &'static str, text: String },

    /// A numeric parameter value is outside its admissible range.
    Parameter { field: &'static str, value: f64, reason: &'static str },
}

impl std::error::Error for InputError {}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Dates ----
            InputError::DateFormat { field, text } => {
                write!(f, "Could not parse the {field} '{text}' as day-first dd/mm/yyyy.")
            }
            InputError::DateOrder { training_start, training_end, test_start, test_end } => {
                write!(
                    f,
                    "Window dates must satisfy training start < training end < test start < \
                     test end; got: {training_start}, {training_end}, {test_start}, {test_end}"
                )
            }
            // ---- Numeric parameters ----
            InputError::NumberFormat { field, text } => {
                write!(f, "Could not parse the {field} '{text}' as a number.")
            }
            InputError::Parameter { field, value, reason } => {
                write!(f, "The {field} {reason}; got: {value}")
            }
        }
    }
}
