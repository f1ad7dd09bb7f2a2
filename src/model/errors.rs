//! Errors for model datasets, fitting, and evaluation.
//!
//! This module defines [`ModelError`], covering every way the inference
//! layer can fail: malformed `{t, x, y}` datasets, fitting attempted on
//! empty data, queries against an engine that has not been fitted, prior
//! hyperparameters a distribution constructor rejects, optimizer failures,
//! non-finite metrics, and diagnostic rendering problems. Implements
//! `Display`/`Error`.
//!
//! ## Conventions
//! - Variants that wrap another layer's error (`Optimization`, `Domain`)
//!   carry it as a `source` field and surface it through `Display`; the
//!   originating detail is never flattened away.
//! - `From` conversions exist for every error type that crosses into this
//!   layer, so `?` works at each seam.
use crate::{optim::errors::OptimError, spatial::errors::DomainError};
use statrs::StatsError;

/// Result alias for model operations that may produce [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;

/// Unified error type for dataset assembly, fitting, and evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Dataset ----
    /// The `{t, x, y}` arrays disagree in length.
    LengthMismatch { times: usize, xs: usize, ys: usize },

    /// A dataset value is NaN or infinite.
    NonFiniteValue { what: &'static str, index: usize, value: f64 },

    /// Event times are not sorted ascending.
    UnsortedTimes { index: usize },

    /// Fitting was attempted with no training events.
    EmptyTrainingData,

    /// Held-out evaluation was attempted with no test events.
    EmptyTestSet,

    // ---- Parameters & priors ----
    /// A natural-scale parameter is outside its admissible range.
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    /// A prior distribution rejected its hyperparameters.
    InvalidPrior { reason: String },

    // ---- Fitting ----
    /// A query requires a fitted model and none exists yet.
    NotFitted,

    /// The optimizer failed; the underlying error is preserved.
    Optimization { source: OptimError },

    // ---- Evaluation ----
    /// A held-out metric evaluated to a NaN or infinite value.
    NonFiniteMetric { metric: &'static str, value: f64 },

    // ---- Environment ----
    /// The spatial domain could not provide what the model needed.
    Domain { source: DomainError },

    /// A diagnostic artifact could not be rendered.
    Render { reason: String },
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Dataset ----
            ModelError::LengthMismatch { times, xs, ys } => {
                write!(
                    f,
                    "Dataset arrays disagree in length: {times} times, {xs} x values, {ys} y \
                     values."
                )
            }
            ModelError::NonFiniteValue { what, index, value } => {
                write!(f, "Dataset {what} at index {index} is not finite: {value}.")
            }
            ModelError::UnsortedTimes { index } => {
                write!(f, "Event times must be ascending; order breaks at index {index}.")
            }
            ModelError::EmptyTrainingData => {
                write!(f, "Cannot fit on an empty training dataset.")
            }
            ModelError::EmptyTestSet => {
                write!(f, "Cannot evaluate held-out metrics on an empty test dataset.")
            }
            // ---- Parameters & priors ----
            ModelError::InvalidParameter { name, value, reason } => {
                write!(f, "The {name} {reason}; got: {value}.")
            }
            ModelError::InvalidPrior { reason } => {
                write!(f, "Prior distribution rejected its hyperparameters: {reason}.")
            }
            // ---- Fitting ----
            ModelError::NotFitted => {
                write!(f, "Model has not been fitted yet.")
            }
            ModelError::Optimization { source } => {
                write!(f, "Optimizer failure: {source}")
            }
            // ---- Evaluation ----
            ModelError::NonFiniteMetric { metric, value } => {
                write!(f, "The {metric} evaluated to a non-finite value: {value}.")
            }
            // ---- Environment ----
            ModelError::Domain { source } => {
                write!(f, "Spatial domain failure: {source}")
            }
            ModelError::Render { reason } => {
                write!(f, "Could not render diagnostic artifact: {reason}.")
            }
        }
    }
}

impl From<OptimError> for ModelError {
    fn from(err: OptimError) -> ModelError {
        ModelError::Optimization { source: err }
    }
}

impl From<DomainError> for ModelError {
    fn from(err: DomainError) -> ModelError {
        ModelError::Domain { source: err }
    }
}

impl From<StatsError> for ModelError {
    fn from(err: StatsError) -> ModelError {
        ModelError::InvalidPrior { reason: err.to_string() }
    }
}
