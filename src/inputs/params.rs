//! Fit-parameter validation.
//!
//! Purpose
//! -------
//! Represent the optimizer knobs a run needs (gradient-ascent learning rate
//! and step count) with range checks applied at construction, plus the
//! defaults the interactive prompts advertise.
//!
//! Key behaviors
//! -------------
//! - [`FitConfig::new`] requires a finite, strictly positive learning rate
//!   and at least one step.
//! - [`FitConfig::parse`] accepts prompt-style text where an empty string
//!   means "use the default".
//!
//! Downstream usage
//! ----------------
//! - The fit engine turns the learning rate into the fixed-step schedule
//!   and the step count into the iteration budget.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the range checks, the defaults, and empty/garbage
//!   text handling.
use crate::inputs::errors::{InputError, InputResult};

/// Prompt wording for the gradient-ascent step size.
pub const LEARNING_RATE_FIELD: &str = "learning rate";
/// Prompt wording for the optimizer iteration budget.
pub const NUM_STEPS_FIELD: &str = "number of steps";

/// Learning rate used when the prompt is left empty.
pub const DEFAULT_LEARNING_RATE: f64 = 0.001;
/// Step count used when the prompt is left empty.
pub const DEFAULT_NUM_STEPS: u64 = 500;

/// `FitConfig` — validated optimizer settings for one run.
///
/// Purpose
/// -------
/// Carry the learning rate and step budget with their range invariants
/// already checked.
///
/// Invariants
/// ----------
/// - `learning_rate` is finite and strictly positive.
/// - `num_steps >= 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitConfig {
    learning_rate: f64,
    num_steps: u64,
}

impl FitConfig {
    /// Construct a validated configuration.
    ///
    /// Parameters
    /// ----------
    /// - `learning_rate`: `f64`
    ///   Fixed gradient-ascent step size; finite and strictly positive.
    /// - `num_steps`: `u64`
    ///   Iteration budget; at least 1.
    ///
    /// Returns
    /// -------
    /// `InputResult<FitConfig>`
    ///   - `Ok(config)` when both values are admissible.
    ///   - `Err(InputError::Parameter)` naming the offending field
    ///     otherwise.
    ///
    /// Panics
    /// ------
    /// - Never panics.
    pub fn new(learning_rate: f64, num_steps: u64) -> InputResult<FitConfig> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(InputError::Parameter {
                field: LEARNING_RATE_FIELD,
                value: learning_rate,
                reason: "must be finite and greater than zero",
            });
        }
        if num_steps == 0 {
            return Err(InputError::Parameter {
                field: NUM_STEPS_FIELD,
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        Ok(FitConfig { learning_rate, num_steps })
    }

    /// Parse prompt-style text, treating empty input as the default.
    ///
    /// Whitespace-only text selects [`DEFAULT_LEARNING_RATE`] resp.
    /// [`DEFAULT_NUM_STEPS`]; anything else must parse as the field's
    /// numeric type or [`InputError::NumberFormat`] names the field.
    pub fn parse(learning_rate: &str, num_steps: &str) -> InputResult<FitConfig> {
        let learning_rate = match learning_rate.trim() {
            "" => DEFAULT_LEARNING_RATE,
            text => text.parse::<f64>().map_err(|_| InputError::NumberFormat {
                field: LEARNING_RATE_FIELD,
                text: text.to_string(),
            })?,
        };
        let num_steps = match num_steps.trim() {
            "" => DEFAULT_NUM_STEPS,
            text => text.parse::<u64>().map_err(|_| InputError::NumberFormat {
                field: NUM_STEPS_FIELD,
                text: text.to_string(),
            })?,
        };
        FitConfig::new(learning_rate, num_steps)
    }

    /// Fixed gradient-ascent step size.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Optimizer iteration budget.
    pub fn num_steps(&self) -> u64 {
        self.num_steps
    }
}

impl Default for FitConfig {
    fn default() -> FitConfig {
        FitConfig { learning_rate: DEFAULT_LEARNING_RATE, num_steps: DEFAULT_NUM_STEPS }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Range validation for both parameters.
    // - Default selection for empty prompt text.
    // - Numeric parse failures naming their field.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure out-of-range parameters are rejected with the offending field
    // named.
    //
    // Given
    // -----
    // - Learning rates 0.0, -0.5, and NaN; a step count of 0.
    //
    // Expect
    // ------
    // - `InputError::Parameter` naming the learning rate resp. the step
    //   count.
    fn new_rejects_out_of_range_values() {
        for rate in [0.0, -0.5, f64::NAN] {
            let err = FitConfig::new(rate, 100).unwrap_err();
            assert!(
                matches!(err, InputError::Parameter { field: LEARNING_RATE_FIELD, .. }),
                "rate {rate}"
            );
        }

        let err = FitConfig::new(0.001, 0).unwrap_err();
        assert!(matches!(err, InputError::Parameter { field: NUM_STEPS_FIELD, .. }));
    }

    #[test]
    // Purpose
    // -------
    // Verify empty prompt text selects the documented defaults and explicit
    // text overrides them.
    //
    // Given
    // -----
    // - Empty strings, then "0.01" / "250".
    //
    // Expect
    // ------
    // - Defaults (0.001, 500) resp. the explicit values.
    fn parse_defaults_on_empty_text() {
        let defaults = FitConfig::parse("  ", "").unwrap();
        assert_eq!(defaults, FitConfig::default());
        assert_eq!(defaults.learning_rate(), DEFAULT_LEARNING_RATE);
        assert_eq!(defaults.num_steps(), DEFAULT_NUM_STEPS);

        let explicit = FitConfig::parse("0.01", "250").unwrap();
        assert_eq!(explicit.learning_rate(), 0.01);
        assert_eq!(explicit.num_steps(), 250);
    }

    #[test]
    // Purpose
    // -------
    // Ensure unparseable numeric text names the offending field.
    //
    // Given
    // -----
    // - A non-numeric learning rate, and a fractional step count.
    //
    // Expect
    // ------
    // - `InputError::NumberFormat` naming the learning rate resp. the step
    //   count.
    fn parse_rejects_garbage_text() {
        let err = FitConfig::parse("fast", "100").unwrap_err();
        assert_eq!(
            err,
            InputError::NumberFormat { field: LEARNING_RATE_FIELD, text: "fast".to_string() }
        );

        let err = FitConfig::parse("0.001", "2.5").unwrap_err();
        assert_eq!(
            err,
            InputError::NumberFormat { field: NUM_STEPS_FIELD, text: "2.5".to_string() }
        );
    }
}
