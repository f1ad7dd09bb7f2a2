//! Hawkes parameterization: natural scale and optimizer space.
//!
//! Purpose
//! -------
//! Provide the model-space parameter container [`HawkesParams`] and the
//! numerically stable mapping between it and the unconstrained optimizer
//! vector θ used by the fixed-step ascent.
//!
//! Mapping conventions
//! -------------------
//! - `θ₀ = a₀` (background log-rate, already unconstrained).
//! - `θ₁ = logit(α)` keeps the branching ratio inside `(0, 1)`.
//! - `θ₂ = ln(β)` keeps the temporal decay positive.
//! - `θ₃ = ln(σ²)` keeps the spatial bandwidth positive.
//!
//! The reverse map uses the clamped logistic from `optim::stability`, so
//! extreme optimizer iterates land strictly inside the open interval
//! instead of on its boundary.
//!
//! Invariants validated by constructors
//! ------------------------------------
//! - `background_log_rate` finite.
//! - `0 < branching_ratio < 1`.
//! - `decay_per_day > 0` and finite; likewise `bandwidth_sq_deg`.
//!
//! Downstream usage
//! ----------------
//! - The likelihood internals read the natural-scale fields directly; the
//!   engine converts traces back to natural scale for diagnostics.
use crate::{
    model::errors::{ModelError, ModelResult},
    optim::{
        stability::{safe_logistic, safe_logit},
        types::Theta,
    },
};
use ndarray::array;

/// Number of free parameters in the model; the `k` in the AIC penalty.
pub const NUM_PARAMS: usize = 4;

/// Constrained model-space parameters for the self-exciting process.
///
/// Invariants are validated at construction; use this type to evaluate
/// intensities, likelihoods, and diagnostics in natural scale.
///
/// See [`HawkesParams::to_theta`] for the optimizer-space mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HawkesParams {
    /// `a₀`, log of the total background rate; `exp(a₀)/|A|` is the
    /// background intensity density over the domain area `|A|`.
    pub background_log_rate: f64,
    /// `α ∈ (0, 1)`, expected number of direct offspring per event.
    pub branching_ratio: f64,
    /// `β > 0`, exponential decay rate of excitation in 1/days.
    pub decay_per_day: f64,
    /// `σ² > 0`, variance of the Gaussian spatial kernel in squared degrees.
    pub bandwidth_sq_deg: f64,
}

impl HawkesParams {
    /// Construct validated natural-scale parameters.
    ///
    /// Returns
    /// -------
    /// `ModelResult<HawkesParams>`
    ///   - `Err(ModelError::InvalidParameter)` naming the first field that
    ///     is non-finite or outside its range.
    pub fn new(
        background_log_rate: f64, branching_ratio: f64, decay_per_day: f64, bandwidth_sq_deg: f64,
    ) -> ModelResult<HawkesParams> {
        if !background_log_rate.is_finite() {
            return Err(ModelError::InvalidParameter {
                name: "background log-rate",
                value: background_log_rate,
                reason: "must be finite",
            });
        }
        if !branching_ratio.is_finite() || branching_ratio <= 0.0 || branching_ratio >= 1.0 {
            return Err(ModelError::InvalidParameter {
                name: "branching ratio",
                value: branching_ratio,
                reason: "must lie strictly between 0 and 1",
            });
        }
        if !decay_per_day.is_finite() || decay_per_day <= 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "temporal decay",
                value: decay_per_day,
                reason: "must be positive and finite",
            });
        }
        if !bandwidth_sq_deg.is_finite() || bandwidth_sq_deg <= 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "spatial bandwidth",
                value: bandwidth_sq_deg,
                reason: "must be positive and finite",
            });
        }
        Ok(HawkesParams { background_log_rate, branching_ratio, decay_per_day, bandwidth_sq_deg })
    }

    /// Map an optimizer iterate back to natural scale.
    ///
    /// Applies the clamped logistic to `θ₁` and `exp` to `θ₂`, `θ₃`, then
    /// runs the same validation as [`HawkesParams::new`], so an iterate
    /// that stepped to an overflow surfaces as a structured error rather
    /// than an infinity in the likelihood. A vector of the wrong length is
    /// [`ModelError::InvalidParameter`] on the parameter count.
    pub fn from_theta(theta: &Theta) -> ModelResult<HawkesParams> {
        if theta.len() != NUM_PARAMS {
            return Err(ModelError::InvalidParameter {
                name: "parameter vector length",
                value: theta.len() as f64,
                reason: "must have exactly four entries",
            });
        }
        HawkesParams::new(theta[0], safe_logistic(theta[1]), theta[2].exp(), theta[3].exp())
    }

    /// Map natural-scale parameters to the unconstrained optimizer vector.
    ///
    /// The construction invariants make every transform well-defined, so
    /// this is infallible.
    pub fn to_theta(&self) -> Theta {
        array![
            self.background_log_rate,
            safe_logit(self.branching_ratio),
            self.decay_per_day.ln(),
            self.bandwidth_sq_deg.ln(),
        ]
    }

    /// Prior-centered starting point for the ascent.
    ///
    /// Background log-rate and branching ratio sit at their prior means
    /// (`a₀ = 1`, `α = 20/80`); decay starts at one inverse day and the
    /// bandwidth at a tenth of a squared degree, mid-prior round numbers.
    pub fn initial() -> HawkesParams {
        HawkesParams {
            background_log_rate: 1.0,
            branching_ratio: 0.25,
            decay_per_day: 1.0,
            bandwidth_sq_deg: 0.1,
        }
    }
}
