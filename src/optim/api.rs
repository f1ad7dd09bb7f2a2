//! High-level entry point for maximizing a [`LogPosterior`].
//!
//! This validates the starting point with the model's own `check`, wraps
//! the model in a [`MapAdapter`] (which *minimizes* `-ℓ(θ)`), and delegates
//! the run to [`run_fixed_step`].
use crate::optim::{
    adapter::MapAdapter,
    errors::OptimResult,
    run::run_fixed_step,
    traits::{AscentOptions, AscentOutcome, LogPosterior},
    types::Theta,
};

/// Maximize an objective `ℓ(θ)` with fixed-step gradient ascent.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in a [`MapAdapter`] that exposes a *minimization*
///   problem `c(θ) = -ℓ(θ)` to `argmin`.
/// - Runs the Landweber solver for exactly `options.num_steps` iterations
///   at the configured learning rate, recording the parameter trace.
///
/// # Parameters
/// - `f`: Your model implementing [`LogPosterior`].
/// - `theta0`: Initial parameter vector.
/// - `data`: Model data passed through to `value`/`grad`.
/// - `options`: Validated step size and budget.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates runtime errors from [`run_fixed_step`] (objective
///   failures, non-finite gradients, backend errors).
///
/// # Returns
/// An [`AscentOutcome`] containing `theta_hat`, the value `ℓ(θ̂)`,
/// termination status, iteration counts, function-evaluation counts, the
/// last gradient norm, and the full parameter trace.
pub fn maximize_posterior<F: LogPosterior>(
    f: &F, theta0: Theta, data: &F::Data, options: &AscentOptions,
) -> OptimResult<AscentOutcome> {
    f.check(&theta0, data)?;
    let problem = MapAdapter::new(f, data);
    run_fixed_step(theta0, options, problem)
}
