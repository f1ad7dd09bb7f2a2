//! Inference-engine capability surface.
//!
//! Purpose
//! -------
//! Define the contract the orchestration layer programs against: fit a
//! point-process model on a training dataset over a spatial domain, score a
//! held-out dataset, report an information criterion, and produce
//! diagnostics. Concrete engines (the Hawkes engine, test stubs) implement
//! this trait; the pipeline never names a concrete engine type.
//!
//! Key behaviors
//! -------------
//! - [`InferenceEngine::fit`] consumes training data plus the run's
//!   optimizer settings and returns a [`FitSummary`]; a successful fit
//!   commits state inside the engine for the later calls.
//! - [`InferenceEngine::log_expected_likelihood`] and
//!   [`InferenceEngine::expected_aic`] score the committed fit.
//! - [`InferenceEngine::diagnostics`] materializes the diagnostic set;
//!   [`InferenceEngine::render_diagnostics`] has a default implementation
//!   that builds the set and renders it to SVG files in one step.
//!
//! Invariants & assumptions
//! ------------------------
//! - Calls other than `fit` require a committed fit; engines reject early
//!   calls with `ModelError::NotFitted` instead of panicking.
//! - A failed `fit` leaves any previously committed fit untouched, so a
//!   later evaluation still refers to the last successful run.
//!
//! Downstream usage
//! ----------------
//! - `pipeline::orchestrator` drives an `InferenceEngine` through the run
//!   sequence and moves it across threads, hence the `Send` bound on
//!   implementors used there.
use std::path::{Path, PathBuf};

use crate::{
    inputs::params::FitConfig,
    model::{
        dataset::ModelDataset, diagnostics::DiagnosticSet, errors::ModelResult,
        params::HawkesParams, render,
    },
    spatial::domain::SpatialDomain,
};

/// `FitSummary` — the outcome of one fitting run.
///
/// Purpose
/// -------
/// Carry the committed parameter estimates together with the optimizer's
/// account of how it got there, for logging and reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct FitSummary {
    /// Fitted parameters on the natural scale.
    pub params: HawkesParams,
    /// Log-posterior value at the fitted parameters.
    pub log_posterior: f64,
    /// Training log-likelihood at the fitted parameters (no priors).
    pub log_likelihood: f64,
    /// Number of ascent iterations the optimizer performed.
    pub iterations: usize,
    /// Optimizer termination status, verbatim.
    pub status: String,
    /// Number of training events the fit used.
    pub num_events: usize,
}

/// `InferenceEngine` — fit, score, and explain a point-process model.
///
/// Purpose
/// -------
/// The seam between orchestration and modeling. The pipeline holds a
/// `dyn`-free generic engine, calls `fit` once per run, and then queries
/// the committed fit through the remaining methods.
///
/// Key behaviors
/// -------------
/// - `fit` validates its inputs, runs the optimizer, and commits state on
///   success only.
/// - Scoring and diagnostic methods borrow the engine immutably; they never
///   alter the committed fit.
pub trait InferenceEngine {
    /// Fit the model to `train` over `domain` using `config`.
    ///
    /// Parameters
    /// ----------
    /// - `train`: `&ModelDataset`
    ///   Training events; must be non-empty.
    /// - `domain`: `&SpatialDomain`
    ///   Admissible region; its area feeds the background rate.
    /// - `config`: `&FitConfig`
    ///   Validated learning rate and step budget.
    ///
    /// Returns
    /// -------
    /// `ModelResult<FitSummary>`
    ///   Summary of the committed fit.
    ///
    /// Errors
    /// ------
    /// - `ModelError::EmptyTrainingData` when `train` has no events.
    /// - `ModelError::Optimization` when the ascent fails.
    fn fit(
        &mut self, train: &ModelDataset, domain: &SpatialDomain, config: &FitConfig,
    ) -> ModelResult<FitSummary>;

    /// Log expected likelihood of `test` under the committed fit.
    ///
    /// Parameters
    /// ----------
    /// - `test`: `&ModelDataset`
    ///   Held-out events, all strictly later than the training span.
    ///
    /// Returns
    /// -------
    /// `ModelResult<f64>`
    ///   Finite log-likelihood of the held-out events.
    ///
    /// Errors
    /// ------
    /// - `ModelError::NotFitted` before any successful fit.
    /// - `ModelError::EmptyTestSet` when `test` has no events.
    fn log_expected_likelihood(&self, test: &ModelDataset) -> ModelResult<f64>;

    /// Expected AIC of the committed fit (`2k - 2·ℓ_train`).
    ///
    /// Returns
    /// -------
    /// `ModelResult<f64>`
    ///   Finite information criterion.
    ///
    /// Errors
    /// ------
    /// - `ModelError::NotFitted` before any successful fit.
    fn expected_aic(&self) -> ModelResult<f64>;

    /// Build the diagnostic set for the committed fit.
    ///
    /// Parameters
    /// ----------
    /// - `grid_resolution`: `usize`
    ///   Cells per axis for the spatial intensity surface.
    ///
    /// Returns
    /// -------
    /// `ModelResult<DiagnosticSet>`
    ///   Surface, excitation shares, temporal curve, and parameter traces.
    ///
    /// Errors
    /// ------
    /// - `ModelError::NotFitted` before any successful fit.
    fn diagnostics(&self, grid_resolution: usize) -> ModelResult<DiagnosticSet>;

    /// Build and render all diagnostics as SVG files under `dir`.
    ///
    /// Parameters
    /// ----------
    /// - `dir`: `&Path`
    ///   Output directory, created if absent.
    /// - `grid_resolution`: `usize`
    ///   Cells per axis for the spatial intensity surface.
    ///
    /// Returns
    /// -------
    /// `ModelResult<Vec<PathBuf>>`
    ///   Paths of the files written, in a fixed order.
    ///
    /// Errors
    /// ------
    /// - Everything [`InferenceEngine::diagnostics`] raises, plus
    ///   `ModelError::Render` for backend failures.
    fn render_diagnostics(&self, dir: &Path, grid_resolution: usize) -> ModelResult<Vec<PathBuf>> {
        let set = self.diagnostics(grid_resolution)?;
        render::render_all(&set, dir)
    }
}
