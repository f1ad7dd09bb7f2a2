//! Execution helper that runs the fixed-step solver on a posterior problem
//! and returns a crate-friendly [`AscentOutcome`].
use crate::optim::{
    adapter::MapAdapter,
    errors::{OptimError, OptimResult},
    trace::TraceRecorder,
    traits::{AscentOptions, AscentOutcome, LogPosterior},
    types::FixedStep,
    validation::validate_theta_input,
    Theta,
};
use argmin::core::{observers::ObserverMode, CostFunction, Executor, State};

/// Run the fixed-step gradient ascent on a posterior problem.
///
/// This wires up:
/// - the model via [`MapAdapter`],
/// - the Landweber solver with the configured learning rate,
/// - initial parameter `theta0`,
/// - a [`TraceRecorder`] observing every iteration,
/// - the exact step budget via `max_iters`,
///   then executes the solver and converts the result into an
///   [`AscentOutcome`].
///
/// # Arguments
/// - `theta0`: Initial parameter vector. It is validated (non-empty, all
///   finite), **consumed**, and set on the solver state via
///   `state.param(theta0)`.
/// - `options`: Validated step size and budget.
/// - `problem`: A [`MapAdapter`] wrapping the model and data.
///
/// # Returns
/// An [`AscentOutcome`] containing the final parameter vector, the
/// objective value ℓ(θ̂) at that vector, termination status, iteration
/// count, function-evaluation counts, the last gradient's norm, and the
/// full parameter trace.
///
/// # Errors
/// - Propagates validation failures for `theta0`.
/// - Propagates any `argmin` runtime error via the crate's
///   `From<argmin::core::Error>` conversion; objective-level failures keep
///   their identity.
/// - Propagates any validation errors encountered when constructing
///   [`AscentOutcome`].
///
/// # Notes
/// The solver only ever evaluates gradients, so the final objective value
/// is recomputed here with one extra cost call; `fn_evals` reflects that
/// call too.
pub fn run_fixed_step<F>(
    theta0: Theta, options: &AscentOptions, problem: MapAdapter<'_, F>,
) -> OptimResult<AscentOutcome>
where
    F: LogPosterior,
{
    validate_theta_input(&theta0)?;
    let evaluator = MapAdapter::new(problem.f, problem.data);
    let solver = FixedStep::new(options.learning_rate);
    let recorder = TraceRecorder::new(&theta0);
    let observer = recorder.clone();

    let executor = Executor::new(problem, solver)
        .configure(|state| state.param(theta0).max_iters(options.num_steps))
        .add_observer(observer, ObserverMode::Always);

    let mut result = executor.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    let theta_hat = result.take_param();

    let value = match &theta_hat {
        Some(theta) => -evaluator.cost(theta).map_err(OptimError::from)?,
        None => return Err(OptimError::MissingThetaHat),
    };
    AscentOutcome::new(
        theta_hat,
        value,
        termination,
        iterations,
        function_counts,
        grad,
        recorder.into_trace()?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::{errors::OptimResult, types::{Cost, Grad}};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - End-to-end convergence of the fixed-step ascent on a concave
    //   quadratic, with and without an analytic gradient.
    // - Trace length, iteration accounting, and termination mapping.
    // - Initial-parameter validation.
    //
    // These tests intentionally DO NOT cover:
    // - The model-facing entry point (see `optim::api`).
    // -------------------------------------------------------------------------

    // Concave quadratic with maximum at (1, 2): ℓ(θ) = -(θ₀-1)² - (θ₁-2)².
    struct Peak {
        analytic: bool,
    }

    impl LogPosterior for Peak {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptimResult<Cost> {
            Ok(-(theta[0] - 1.0).powi(2) - (theta[1] - 2.0).powi(2))
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptimResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _data: &()) -> OptimResult<Grad> {
            if self.analytic {
                Ok(array![-2.0 * (theta[0] - 1.0), -2.0 * (theta[1] - 2.0)])
            } else {
                Err(OptimError::GradientNotImplemented)
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the ascent walks to the maximum with an analytic gradient and
    // reports a complete outcome.
    //
    // Given
    // -----
    // - The quadratic peaked at (1, 2), θ₀ = (0, 0), rate 0.4, 50 steps.
    //
    // Expect
    // ------
    // - θ̂ within 1e-6 of (1, 2); value near 0; 50 iterations; a trace of
    //   51 iterates; converged via the step budget.
    fn run_converges_with_analytic_gradient() {
        let model = Peak { analytic: true };
        let options = AscentOptions::new(0.4, 50).unwrap();
        let problem = MapAdapter::new(&model, &());

        let outcome = run_fixed_step(array![0.0, 0.0], &options, problem).unwrap();

        assert!((outcome.theta_hat[0] - 1.0).abs() < 1e-6);
        assert!((outcome.theta_hat[1] - 2.0).abs() < 1e-6);
        assert!(outcome.value.abs() < 1e-10);
        assert_eq!(outcome.iterations, 50);
        assert_eq!(outcome.trace.len(), 51);
        assert!(outcome.converged);
        assert!(outcome.status.contains("MaxItersReached"));
        assert!(outcome.grad_norm.unwrap() < 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // Verify the finite-difference fallback reaches the same maximum.
    //
    // Given
    // -----
    // - The same quadratic without an analytic gradient.
    //
    // Expect
    // ------
    // - θ̂ within 1e-4 of (1, 2); the trace starts at θ₀.
    fn run_converges_with_finite_differences() {
        let model = Peak { analytic: false };
        let options = AscentOptions::new(0.4, 60).unwrap();
        let problem = MapAdapter::new(&model, &());

        let outcome = run_fixed_step(array![0.0, 0.0], &options, problem).unwrap();

        assert!((outcome.theta_hat[0] - 1.0).abs() < 1e-4);
        assert!((outcome.theta_hat[1] - 2.0).abs() < 1e-4);
        assert_eq!(outcome.trace.steps()[0], array![0.0, 0.0]);
    }

    #[test]
    // Purpose
    // -------
    // Ensure invalid starting points are rejected before any step runs.
    //
    // Given
    // -----
    // - An empty θ₀ and one containing NaN.
    //
    // Expect
    // ------
    // - `EmptyTheta` resp. `InvalidThetaInput`.
    fn run_rejects_invalid_starting_points() {
        let model = Peak { analytic: true };
        let options = AscentOptions::new(0.1, 5).unwrap();

        let err =
            run_fixed_step(array![], &options, MapAdapter::new(&model, &())).unwrap_err();
        assert_eq!(err, OptimError::EmptyTheta);

        let err = run_fixed_step(array![f64::NAN, 0.0], &options, MapAdapter::new(&model, &()))
            .unwrap_err();
        assert!(matches!(err, OptimError::InvalidThetaInput { index: 0, .. }));
    }
}
