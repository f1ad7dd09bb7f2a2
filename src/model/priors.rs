//! Prior distributions over the four model parameters.
//!
//! Purpose
//! -------
//! Carry the hyperparameters of the four priors and evaluate their joint
//! log-density in the optimizer's unconstrained space, where the MAP
//! objective is maximized.
//!
//! Distributions
//! -------------
//! - Background log-rate `a₀ ~ Normal(mean, std)`.
//! - Branching ratio `α ~ Beta(a, b)`.
//! - Temporal decay `β ~ HalfNormal(scale)`.
//! - Spatial bandwidth `σ² ~ HalfNormal(scale)`.
//!
//! The half-normal is evaluated as `ln 2 + Normal(0, scale).ln_pdf(x)` for
//! `x ≥ 0`; `statrs` has no half-normal of its own.
//!
//! Change of variables
//! -------------------
//! The ascent runs over `θ = (a₀, logit α, ln β, ln σ²)`, so the prior
//! density picks up the log-Jacobians of the inverse transforms:
//! `+ ln(α(1 − α))` for the logistic and `+ ln β`, `+ ln σ²` for the two
//! exponentials. [`PriorSet::unconstrained_log_density`] includes these
//! terms; omitting them would shift the MAP estimate.
//!
//! Invariants & assumptions
//! ------------------------
//! - Hyperparameters are validated at construction by building each
//!   `statrs` distribution once, so a bad prior fails at configuration
//!   time instead of mid-ascent.
//! - Density evaluation assumes [`HawkesParams`] invariants (all supports
//!   respected), which construction of that type guarantees.
use crate::model::{errors::ModelResult, params::HawkesParams};
use statrs::distribution::{Beta, Continuous, Normal};
use std::f64::consts::LN_2;

/// `PriorSet` — hyperparameters of the four parameter priors.
///
/// The default set matches the original application's choices:
/// `a₀ ~ Normal(1, 10)`, `α ~ Beta(20, 60)`, `β ~ HalfNormal(2.0)`,
/// `σ² ~ HalfNormal(0.25)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorSet {
    /// Mean of the normal prior on `a₀`.
    pub background_mean: f64,
    /// Standard deviation of the normal prior on `a₀`.
    pub background_std: f64,
    /// First shape of the beta prior on `α`.
    pub branching_shape_a: f64,
    /// Second shape of the beta prior on `α`.
    pub branching_shape_b: f64,
    /// Scale of the half-normal prior on `β`.
    pub decay_scale: f64,
    /// Scale of the half-normal prior on `σ²`.
    pub bandwidth_scale: f64,
}

impl Default for PriorSet {
    fn default() -> PriorSet {
        PriorSet {
            background_mean: 1.0,
            background_std: 10.0,
            branching_shape_a: 20.0,
            branching_shape_b: 60.0,
            decay_scale: 2.0,
            bandwidth_scale: 0.25,
        }
    }
}

impl PriorSet {
    /// Construct a validated prior set.
    ///
    /// Builds each distribution once so `statrs` rejections (non-positive
    /// scales or shapes, NaNs) surface here as
    /// [`ModelError::InvalidPrior`](crate::model::errors::ModelError).
    pub fn new(
        background_mean: f64, background_std: f64, branching_shape_a: f64,
        branching_shape_b: f64, decay_scale: f64, bandwidth_scale: f64,
    ) -> ModelResult<PriorSet> {
        let set = PriorSet {
            background_mean,
            background_std,
            branching_shape_a,
            branching_shape_b,
            decay_scale,
            bandwidth_scale,
        };
        set.distributions()?;
        Ok(set)
    }

    /// Joint prior log-density of `params` in unconstrained θ-space.
    ///
    /// Sums the four natural-scale log-densities and the change-of-variable
    /// log-Jacobians described in the module header. Finite whenever the
    /// parameters respect their supports, which [`HawkesParams`]
    /// construction guarantees.
    pub fn unconstrained_log_density(&self, params: &HawkesParams) -> ModelResult<f64> {
        let (background, branching) = self.distributions()?;
        let alpha = params.branching_ratio;
        let decay = params.decay_per_day;
        let bandwidth = params.bandwidth_sq_deg;

        let natural = background.ln_pdf(params.background_log_rate)
            + branching.ln_pdf(alpha)
            + half_normal_ln_pdf(self.decay_scale, decay)?
            + half_normal_ln_pdf(self.bandwidth_scale, bandwidth)?;
        let jacobians = (alpha * (1.0 - alpha)).ln() + decay.ln() + bandwidth.ln();
        Ok(natural + jacobians)
    }

    // Build the statrs distributions, surfacing hyperparameter rejections.
    fn distributions(&self) -> ModelResult<(Normal, Beta)> {
        let background = Normal::new(self.background_mean, self.background_std)?;
        let branching = Beta::new(self.branching_shape_a, self.branching_shape_b)?;
        // The two half-normal scales pass through Normal's validation.
        Normal::new(0.0, self.decay_scale)?;
        Normal::new(0.0, self.bandwidth_scale)?;
        Ok((background, branching))
    }
}

// ln 2 + Normal(0, scale).ln_pdf(x), the half-normal density for x >= 0.
fn half_normal_ln_pdf(scale: f64, x: f64) -> ModelResult<f64> {
    Ok(LN_2 + Normal::new(0.0, scale)?.ln_pdf(x))
}
