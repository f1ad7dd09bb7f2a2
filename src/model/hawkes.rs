//! Hawkes process engine — MAP objective and fitting lifecycle.
//!
//! Purpose
//! -------
//! Tie the likelihood internals, the prior layer, and the optimizer together
//! into the concrete [`InferenceEngine`]: a self-exciting point process with
//! a uniform background rate over the admissible domain, an exponential
//! temporal kernel, and a Gaussian spatial kernel.
//!
//! Key behaviors
//! -------------
//! - [`HawkesObjective`] implements [`LogPosterior`] in the unconstrained
//!   θ-space: objective = data log-likelihood + prior log-density including
//!   the change-of-variable terms. No analytic gradient is supplied; the
//!   optimizer falls back to finite differences.
//! - [`HawkesEngine::fit`] starts the ascent from the prior-centered
//!   [`HawkesParams::initial`] point, runs the configured step budget, and
//!   commits the fitted state only after the whole run succeeds.
//! - Held-out scoring re-uses the committed training events as exciting
//!   history: the test events are merged behind them and scored over the
//!   span `[first test time, last test time]`.
//! - Expected AIC is `2k − 2·ℓ_train` with `k = 4` parameters.
//!
//! Invariants & assumptions
//! ------------------------
//! - The training horizon is the last training offset; training offsets
//!   start at zero by construction of the partition step.
//! - A failed fit never clobbers a previously committed fit: state is
//!   assigned last, after every fallible step.
//!
//! Conventions
//! -----------
//! - θ = (a₀, logit α, ln β, ln σ²); conversions live in
//!   [`HawkesParams::from_theta`] / [`HawkesParams::to_theta`].
//!
//! Downstream usage
//! ----------------
//! - `pipeline::orchestrator` owns a `HawkesEngine` behind the
//!   [`InferenceEngine`] trait and drives the run sequence against it.
//!
//! Testing notes
//! -------------
//! - Tests check the objective against a hand-assembled likelihood + prior
//!   sum, the fit lifecycle on a tiny synthetic set, and the rejection
//!   paths (`NotFitted`, `EmptyTestSet`, state retention after a failed
//!   re-fit).
use crate::{
    inputs::params::FitConfig,
    model::{
        capability::{FitSummary, InferenceEngine},
        dataset::ModelDataset,
        diagnostics::{self, DiagnosticSet},
        errors::{ModelError, ModelResult},
        intensity,
        params::{HawkesParams, NUM_PARAMS},
        priors::PriorSet,
    },
    optim::{
        api::maximize_posterior,
        errors::OptimResult,
        trace::ParameterTrace,
        traits::{AscentOptions, LogPosterior},
        types::{Cost, Theta},
    },
    spatial::domain::SpatialDomain,
};

/// `HawkesObjective` — the MAP objective over unconstrained θ.
///
/// Purpose
/// -------
/// Evaluate `ℓ(θ) = loglik(θ; data) + ln p(θ)` for the optimizer. The
/// per-fit constants (domain area, observation horizon) are fixed at
/// construction so `value` only needs θ and the training dataset.
///
/// Invariants
/// ----------
/// - `area` is finite and strictly positive; `horizon` is finite and
///   non-negative.
#[derive(Debug, Clone)]
pub struct HawkesObjective {
    priors: PriorSet,
    area: f64,
    horizon: f64,
}

impl HawkesObjective {
    /// Build an objective for one fitting run.
    ///
    /// Parameters
    /// ----------
    /// - `priors`: `PriorSet`
    ///   Validated prior hyperparameters.
    /// - `area`: `f64`
    ///   Admissible-domain area in squared degrees.
    /// - `horizon`: `f64`
    ///   Upper end of the observation window in days (the last training
    ///   offset).
    ///
    /// Returns
    /// -------
    /// `ModelResult<HawkesObjective>`
    ///
    /// Errors
    /// ------
    /// - `ModelError::InvalidParameter` for a non-positive or non-finite
    ///   area, or a negative or non-finite horizon.
    pub fn new(priors: PriorSet, area: f64, horizon: f64) -> ModelResult<HawkesObjective> {
        if !area.is_finite() || area <= 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "domain area",
                value: area,
                reason: "must be positive and finite",
            });
        }
        if !horizon.is_finite() || horizon < 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "observation horizon",
                value: horizon,
                reason: "must be non-negative and finite",
            });
        }
        Ok(HawkesObjective { priors, area, horizon })
    }
}

impl LogPosterior for HawkesObjective {
    type Data = ModelDataset;

    /// Log-posterior at `theta` given the training data.
    ///
    /// Maps θ to natural-scale parameters, evaluates the point-process
    /// log-likelihood over `[0, horizon]` with the data as its own exciting
    /// history, and adds the unconstrained prior log-density.
    ///
    /// Errors
    /// ------
    /// - `OptimError::ObjectiveFailure` when θ cannot be mapped to valid
    ///   parameters or a prior distribution rejects its hyperparameters.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptimResult<Cost> {
        let params = HawkesParams::from_theta(theta)?;
        let loglik = intensity::log_likelihood(&params, data, data, self.area, 0.0, self.horizon);
        let prior = self.priors.unconstrained_log_density(&params)?;
        Ok(loglik + prior)
    }

    /// Pre-run gate: reject empty training data and unmappable θ₀.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptimResult<()> {
        if data.is_empty() {
            return Err(ModelError::EmptyTrainingData.into());
        }
        HawkesParams::from_theta(theta)?;
        Ok(())
    }
}

// Committed outcome of one successful fit.
#[derive(Debug, Clone)]
struct FittedState {
    params: HawkesParams,
    train: ModelDataset,
    domain: SpatialDomain,
    area: f64,
    horizon: f64,
    log_likelihood: f64,
    trace: ParameterTrace,
}

/// `HawkesEngine` — the concrete [`InferenceEngine`].
///
/// Purpose
/// -------
/// Hold the prior configuration and, after a successful fit, the committed
/// state every later call scores against.
///
/// Key behaviors
/// -------------
/// - Scoring and diagnostics before any successful fit return
///   `ModelError::NotFitted`.
/// - Re-fitting replaces the committed state only on success.
#[derive(Debug, Clone)]
pub struct HawkesEngine {
    priors: PriorSet,
    state: Option<FittedState>,
}

impl HawkesEngine {
    /// Create an unfitted engine with the given priors.
    pub fn new(priors: PriorSet) -> HawkesEngine {
        HawkesEngine { priors, state: None }
    }

    /// Fitted parameters of the committed fit.
    ///
    /// Errors
    /// ------
    /// - `ModelError::NotFitted` before any successful fit.
    pub fn fitted_params(&self) -> ModelResult<&HawkesParams> {
        Ok(&self.fitted()?.params)
    }

    fn fitted(&self) -> ModelResult<&FittedState> {
        self.state.as_ref().ok_or(ModelError::NotFitted)
    }
}

impl Default for HawkesEngine {
    fn default() -> HawkesEngine {
        HawkesEngine::new(PriorSet::default())
    }
}

impl InferenceEngine for HawkesEngine {
    /// Fit the model and commit the result.
    ///
    /// # Steps
    /// 1. Derive the horizon from the last training offset and the area
    ///    from the domain.
    /// 2. Build the objective and ascent options; start from the
    ///    prior-centered θ₀.
    /// 3. Run the fixed-step ascent with finite-difference gradients.
    /// 4. Map θ̂ back to natural-scale parameters and recompute the
    ///    training log-likelihood without the prior terms.
    /// 5. Commit the state and return the summary.
    ///
    /// Errors
    /// ------
    /// - `ModelError::EmptyTrainingData` when `train` has no events.
    /// - `ModelError::Optimization` when any optimizer stage fails.
    /// - `ModelError::NonFiniteMetric` if the recomputed training
    ///   log-likelihood is not finite.
    fn fit(
        &mut self, train: &ModelDataset, domain: &SpatialDomain, config: &FitConfig,
    ) -> ModelResult<FitSummary> {
        let (_, horizon) = train.time_span().ok_or(ModelError::EmptyTrainingData)?;
        let area = domain.area();
        let objective = HawkesObjective::new(self.priors, area, horizon)?;
        let options = AscentOptions::new(config.learning_rate(), config.num_steps())?;
        let theta0 = HawkesParams::initial().to_theta();

        let outcome = maximize_posterior(&objective, theta0, train, &options)?;

        let params = HawkesParams::from_theta(&outcome.theta_hat)?;
        let log_likelihood = intensity::log_likelihood(&params, train, train, area, 0.0, horizon);
        if !log_likelihood.is_finite() {
            return Err(ModelError::NonFiniteMetric {
                metric: "training log-likelihood",
                value: log_likelihood,
            });
        }

        let summary = FitSummary {
            params,
            log_posterior: outcome.value,
            log_likelihood,
            iterations: outcome.iterations,
            status: outcome.status,
            num_events: train.len(),
        };
        self.state = Some(FittedState {
            params,
            train: train.clone(),
            domain: domain.clone(),
            area,
            horizon,
            log_likelihood,
            trace: outcome.trace,
        });
        Ok(summary)
    }

    /// Log expected likelihood of the held-out events.
    ///
    /// The committed training events and any earlier test events form the
    /// exciting history; the window runs from the first to the last test
    /// offset.
    fn log_expected_likelihood(&self, test: &ModelDataset) -> ModelResult<f64> {
        let state = self.fitted()?;
        let (from, to) = test.time_span().ok_or(ModelError::EmptyTestSet)?;
        let merged = state.train.merged_with(test)?;
        let value = intensity::log_likelihood(&state.params, test, &merged, state.area, from, to);
        if !value.is_finite() {
            return Err(ModelError::NonFiniteMetric {
                metric: "log expected likelihood",
                value,
            });
        }
        Ok(value)
    }

    /// Expected AIC of the committed fit.
    fn expected_aic(&self) -> ModelResult<f64> {
        let state = self.fitted()?;
        Ok(2.0 * NUM_PARAMS as f64 - 2.0 * state.log_likelihood)
    }

    /// Assemble all four diagnostics from the committed fit.
    fn diagnostics(&self, grid_resolution: usize) -> ModelResult<DiagnosticSet> {
        let state = self.fitted()?;
        let spatial = diagnostics::spatial_intensity_surface(
            &state.params,
            &state.train,
            &state.domain,
            grid_resolution,
            state.horizon,
        )?;
        let excitation =
            diagnostics::excitation_proportion(&state.params, &state.train, state.area)?;
        let temporal =
            diagnostics::temporal_intensity_curve(&state.params, &state.train, state.horizon);
        let traces = diagnostics::parameter_traces(&state.trace)?;
        Ok(DiagnosticSet { spatial, excitation, temporal, traces })
    }
}
