//! Adapter that exposes a [`LogPosterior`] as an `argmin` problem.
//!
//! We convert a *maximization* of an objective `ℓ(θ)` into a *minimization*
//! problem by defining the cost as `c(θ) = -ℓ(θ)`. Analytic gradients (if
//! provided by the model) are negated accordingly. If a gradient is not
//! provided, we finite-difference the **cost** closure, so no sign flip is
//! needed in that branch.
use std::cell::RefCell;

use crate::optim::{
    errors::OptimError,
    traits::LogPosterior,
    types::{Cost, Grad, Theta},
    validation::validate_grad,
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a [`LogPosterior`] to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)` (negative log-posterior).
/// - `Gradient::gradient` returns:
///   - `-∇ℓ(θ)` if the model provides an analytic gradient, or
///   - a finite-difference gradient of the cost (no sign flip needed).
#[derive(Debug)]
pub struct MapAdapter<'a, F: LogPosterior> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogPosterior> CostFunction for MapAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// - Calls the model's `value(θ, data)` and checks the result is
    ///   finite.
    /// - Returns `Error(NonFiniteCost)` if the value is not finite.
    ///
    /// # Errors
    /// Propagates any `OptimError` from the model's `value` via `?`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptimError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogPosterior> Gradient for MapAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Behavior:
    /// - If the model implements `grad(θ, data)`, we validate it and
    ///   return `-grad` (because the cost is `-ℓ`).
    /// - Otherwise, we compute a finite-difference gradient of the
    ///   **cost**:
    ///   - Try *central* differences first.
    ///   - If any evaluation of the `cost` closure failed (captured via
    ///     `closure_err`), retry with *forward* differences.
    ///   - Validate the FD gradient; if it fails (e.g., non-finite), retry
    ///     once with *forward* differences and validate again.
    ///
    /// Implementation notes:
    /// - The FD closure must return `f64`, so we can't use `?` inside it;
    ///   we capture the first error in `closure_err` and return `NaN` from
    ///   the closure. After FD, we turn that captured error back into a
    ///   real error (or switch to forward diff).
    ///
    /// # Errors
    /// - Propagates model errors from `grad` (non-`GradientNotImplemented`).
    /// - Propagates any error raised by cost evaluations performed during
    ///   FD.
    /// - Returns validation errors if the gradient has wrong dimension or
    ///   non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(e) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                match e {
                    OptimError::GradientNotImplemented => {
                        let cost_func = |theta: &Theta| -> f64 {
                            match self.cost(theta) {
                                Ok(val) => val,
                                Err(e) => {
                                    let mut slot = closure_err.borrow_mut();
                                    if slot.is_none() {
                                        *slot = Some(e);
                                    }
                                    f64::NAN
                                }
                            }
                        };
                        let mut fd_grad = theta.central_diff(&cost_func);
                        if closure_err.borrow().is_some() {
                            fd_grad = run_fd_diff(theta, &cost_func, &closure_err)?;
                            return Ok(fd_grad);
                        }
                        match validate_grad(&fd_grad, dim) {
                            Ok(()) => Ok(fd_grad),
                            Err(_) => {
                                fd_grad = run_fd_diff(theta, &cost_func, &closure_err)?;
                                Ok(fd_grad)
                            }
                        }
                    }
                    _ => Err(e.into()),
                }
            }
        }
    }
}

impl<'a, F: LogPosterior> MapAdapter<'a, F> {
    /// Construct a new adapter over a [`LogPosterior`] and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

/// Compute a forward-difference gradient of `func` at `theta`, with error
/// capture.
///
/// The FD closure can't return `Result`, so any error raised by `func` is
/// stored into `closure_err` and the closure returns `NaN`. This helper:
/// - clears `closure_err`,
/// - performs `forward_diff`,
/// - if an error was captured, returns it as `Err`,
/// - validates the resulting gradient,
/// - if validation succeeds, returns the gradient as `Ok(grad)`.
///
/// # Errors
/// Returns any error captured during evaluation of `func` inside the FD
/// routine or by validation of the resulting gradient.
fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::errors::OptimResult;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Sign conventions for cost and analytic gradients.
    // - The finite-difference fallback when no analytic gradient exists.
    // - Error propagation from a failing objective.
    //
    // These tests intentionally DO NOT cover:
    // - Executor wiring (see `optim::run`).
    // -------------------------------------------------------------------------

    // Purpose
    // -------
    // Concave quadratic ℓ(θ) = -Σ (θ_i - 1)², optionally with analytic
    // gradient ∇ℓ = -2(θ - 1).
    struct Quadratic {
        analytic: bool,
    }

    impl LogPosterior for Quadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptimResult<Cost> {
            Ok(-theta.iter().map(|t| (t - 1.0).powi(2)).sum::<f64>())
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptimResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _data: &()) -> OptimResult<Grad> {
            if self.analytic {
                Ok(theta.mapv(|t| -2.0 * (t - 1.0)))
            } else {
                Err(OptimError::GradientNotImplemented)
            }
        }
    }

    // Objective that always fails, for propagation checks.
    struct Broken;

    impl LogPosterior for Broken {
        type Data = ();

        fn value(&self, _theta: &Theta, _data: &()) -> OptimResult<Cost> {
            Err(OptimError::ObjectiveFailure { reason: "broken on purpose".to_string() })
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptimResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the cost is the negated objective.
    //
    // Given
    // -----
    // - The quadratic at θ = [0, 0], where ℓ = -2.
    //
    // Expect
    // ------
    // - `cost == 2.0`.
    fn cost_negates_objective() {
        let model = Quadratic { analytic: false };
        let adapter = MapAdapter::new(&model, &());

        let cost = adapter.cost(&array![0.0, 0.0]).unwrap();

        assert!((cost - 2.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the analytic gradient is negated into cost space.
    //
    // Given
    // -----
    // - The quadratic with analytic gradient at θ = [0, 3].
    //
    // Expect
    // ------
    // - `∇c = 2(θ - 1) = [-2, 4]`.
    fn analytic_gradient_is_negated() {
        let model = Quadratic { analytic: true };
        let adapter = MapAdapter::new(&model, &());

        let grad = adapter.gradient(&array![0.0, 3.0]).unwrap();

        assert!((grad[0] - -2.0).abs() < 1e-12);
        assert!((grad[1] - 4.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the finite-difference fallback agrees with the analytic cost
    // gradient.
    //
    // Given
    // -----
    // - The quadratic without analytic gradient at θ = [0, 3].
    //
    // Expect
    // ------
    // - FD gradient within 1e-5 of [-2, 4].
    fn finite_difference_fallback_matches_analytic() {
        let model = Quadratic { analytic: false };
        let adapter = MapAdapter::new(&model, &());

        let grad = adapter.gradient(&array![0.0, 3.0]).unwrap();

        assert!((grad[0] - -2.0).abs() < 1e-5, "got {}", grad[0]);
        assert!((grad[1] - 4.0).abs() < 1e-5, "got {}", grad[1]);
    }

    #[test]
    // Purpose
    // -------
    // Verify objective failures propagate through both cost and FD
    // gradient paths with their identity intact.
    //
    // Given
    // -----
    // - The always-failing objective.
    //
    // Expect
    // ------
    // - Both calls fail; converting the error back recovers
    //   `ObjectiveFailure`.
    fn objective_failures_propagate() {
        let adapter = MapAdapter::new(&Broken, &());

        let cost_err = OptimError::from(adapter.cost(&array![0.0]).unwrap_err());
        let grad_err = OptimError::from(adapter.gradient(&array![0.0]).unwrap_err());

        assert!(matches!(cost_err, OptimError::ObjectiveFailure { .. }));
        assert!(matches!(grad_err, OptimError::ObjectiveFailure { .. }));
    }
}
