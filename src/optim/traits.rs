//! Public API surface for log-posterior maximization.
//!
//! - [`LogPosterior`]: trait models implement for their MAP objective.
//! - [`AscentOptions`]: configuration for the fixed-step gradient ascent.
//! - [`AscentOutcome`]: normalized result returned by the high-level
//!   `maximize_posterior` API.
//!
//! Convention: we *maximize* an objective `ℓ(θ)` by minimizing the cost
//! `c(θ) = -ℓ(θ)`. If an analytic gradient is provided, it should be the
//! gradient of the objective (`∇ℓ(θ)`); the adapter flips the sign as
//! needed.
use crate::optim::{
    errors::{OptimError, OptimResult},
    trace::ParameterTrace,
    types::{Cost, FnEvalMap, Grad, Theta},
    validation::{validate_theta_hat, validate_value},
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;

/// Model-implemented log-posterior interface.
///
/// You maximize `ℓ(θ)`; internally we minimize the cost `c(θ) = -ℓ(θ)`.
/// If you provide an analytic gradient, return the gradient of the
/// objective `∇ℓ(θ)` (the adapter flips the sign to match the cost).
///
/// - `type Data`: per-model data carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptimResult<Cost>`: evaluate `ℓ(θ)`.
///   - Errors: return a descriptive `OptimError` for invalid inputs or
///     model failures.
/// - `check(&Theta, &Data) -> OptimResult<()>`: validation hook to reject
///   obviously invalid `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptimResult<Grad>`: analytic gradient
///   `∇ℓ(θ)`. If not implemented, robust finite differences are used
///   automatically.
pub trait LogPosterior {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptimResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptimResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptimResult<Grad> {
        Err(OptimError::GradientNotImplemented)
    }
}

/// Optimizer-level configuration for the fixed-step ascent.
///
/// Fields:
/// - `learning_rate: f64` — constant step size ω applied to the gradient
///   at every iteration.
/// - `num_steps: u64` — exact number of iterations to run; the solver has
///   no other stopping rule.
///
/// Constructor:
/// - `new(learning_rate, num_steps) -> OptimResult<Self>` — validates both
///   fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AscentOptions {
    pub learning_rate: f64,
    pub num_steps: u64,
}

impl AscentOptions {
    /// Create a validated set of ascent options.
    ///
    /// # Rules
    /// - `learning_rate` must be **finite and strictly positive**.
    /// - `num_steps` must be `>= 1`.
    ///
    /// # Errors
    /// - [`OptimError::InvalidLearningRate`] for a non-finite or
    ///   non-positive rate.
    /// - [`OptimError::InvalidStepBudget`] for a zero step count.
    pub fn new(learning_rate: f64, num_steps: u64) -> OptimResult<Self> {
        if !learning_rate.is_finite() {
            return Err(OptimError::InvalidLearningRate {
                value: learning_rate,
                reason: "Learning rate must be finite.",
            });
        }
        if learning_rate <= 0.0 {
            return Err(OptimError::InvalidLearningRate {
                value: learning_rate,
                reason: "Learning rate must be positive.",
            });
        }
        if num_steps == 0 {
            return Err(OptimError::InvalidStepBudget {
                steps: num_steps,
                reason: "At least one step is required.",
            });
        }
        Ok(Self { learning_rate, num_steps })
    }
}

/// Canonical result returned by `maximize_posterior`.
///
/// - `theta_hat`: final parameter vector (validated finite).
/// - `value`: objective value `ℓ(θ̂)` at the final iterate (not the cost).
/// - `converged`: `true` if the solver reported a terminating status other
///   than `NotTerminated`; for a pure step-budget run this means the
///   budget was exhausted.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of solver iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
///   Keys follow argmin's counters, e.g., gradient_count.
/// - `grad_norm`: norm of the last available gradient, if present.
/// - `trace`: parameter vector after every iteration, starting at θ₀.
#[derive(Debug, Clone, PartialEq)]
pub struct AscentOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
    pub trace: ParameterTrace,
}

impl AscentOutcome {
    /// Build a validated [`AscentOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all
    ///   finite).
    /// - `value` check via `validate_value` (finite).
    /// - Maps `TerminationStatus` into `(converged, status)`.
    /// - Computes `grad_norm` if a gradient was provided.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, converged: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>, trace: ParameterTrace,
    ) -> OptimResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let status: String;
        let converged = match converged {
            TerminationStatus::NotTerminated => {
                status = "Not terminated".to_string();
                false
            }
            _ => {
                status = format!("{converged:?}");
                true
            }
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm, trace })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmin::core::TerminationReason;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Range validation in `AscentOptions::new`.
    // - Termination-status mapping and validation in `AscentOutcome::new`.
    //
    // These tests intentionally DO NOT cover:
    // - End-to-end solver behavior (see `optim::run`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure `AscentOptions::new` enforces both field ranges.
    //
    // Given
    // -----
    // - Rates 0.0, -1.0, NaN with a valid budget; a valid rate with budget
    //   0; and a fully valid pair.
    //
    // Expect
    // ------
    // - `InvalidLearningRate` / `InvalidStepBudget` for the bad inputs;
    //   `Ok` preserving values for the good pair.
    fn ascent_options_validates_fields() {
        for rate in [0.0, -1.0, f64::NAN] {
            let err = AscentOptions::new(rate, 10).unwrap_err();
            assert!(matches!(err, OptimError::InvalidLearningRate { .. }), "rate {rate}");
        }

        let err = AscentOptions::new(0.5, 0).unwrap_err();
        assert!(matches!(err, OptimError::InvalidStepBudget { steps: 0, .. }));

        let opts = AscentOptions::new(0.01, 250).unwrap();
        assert_eq!(opts.learning_rate, 0.01);
        assert_eq!(opts.num_steps, 250);
    }

    #[test]
    // Purpose
    // -------
    // Verify termination mapping and theta-hat validation in the outcome
    // constructor.
    //
    // Given
    // -----
    // - A terminated status with a valid theta, then a missing theta.
    //
    // Expect
    // ------
    // - `converged == true` with the reason in `status`; then
    //   `MissingThetaHat`.
    fn ascent_outcome_maps_termination_and_validates() {
        let trace = ParameterTrace::new(vec![array![0.0, 0.0]]);
        let outcome = AscentOutcome::new(
            Some(array![1.0, 2.0]),
            -3.5,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            50,
            FnEvalMap::new(),
            Some(array![0.1, -0.1]),
            trace.clone(),
        )
        .unwrap();

        assert!(outcome.converged);
        assert!(outcome.status.contains("MaxItersReached"));
        assert_eq!(outcome.iterations, 50);
        assert!(outcome.grad_norm.unwrap() > 0.0);

        let err = AscentOutcome::new(
            None,
            -3.5,
            TerminationStatus::NotTerminated,
            0,
            FnEvalMap::new(),
            None,
            trace,
        )
        .unwrap_err();
        assert_eq!(err, OptimError::MissingThetaHat);
    }
}
