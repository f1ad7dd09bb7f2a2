//! Error taxonomy for the orchestration layer.
//!
//! Purpose
//! -------
//! Fold every failure a run can hit into one enum so a caller handles a
//! single terminal error per run. Each upstream layer keeps its own error
//! type; `From` conversions at the bottom of this file wrap them unchanged
//! so the original message survives.
//!
//! Conventions
//! -----------
//! - Exactly one terminal error per run: the first failing step aborts the
//!   remainder and becomes the run's result.
//! - Run-management failures (`RunInFlight`, a poisoned session lock, a
//!   vanished worker) are this layer's own; everything else is a wrapped
//!   upstream error.
use crate::{
    events::errors::{LoadError, PartitionError},
    inputs::errors::InputError,
    model::errors::ModelError,
    spatial::errors::DomainError,
};

/// Convenience alias for orchestration-layer results.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// One terminal error per orchestration run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    // ---- Wrapped upstream failures ----
    /// Loading an events or roads file failed.
    Load { source: LoadError },

    /// A window or hyperparameter input was rejected.
    Input { source: InputError },

    /// Partitioning the catalog failed.
    Partition { source: PartitionError },

    /// Building the spatial domain failed.
    Domain { source: DomainError },

    /// A modeling step (fit, evaluation, diagnostics) failed.
    Model { source: ModelError },

    // ---- Run management ----
    /// A run was submitted while another is still in flight.
    RunInFlight,

    /// The session lock was poisoned by a panicking run.
    SessionPoisoned,

    /// The background worker ended without delivering a result.
    Worker { reason: &'static str },
}

impl std::error::Error for PipelineError {}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Wrapped upstream failures ----
            PipelineError::Load { source } => write!(f, "{source}"),
            PipelineError::Input { source } => write!(f, "{source}"),
            PipelineError::Partition { source } => write!(f, "{source}"),
            PipelineError::Domain { source } => write!(f, "{source}"),
            PipelineError::Model { source } => write!(f, "{source}"),
            // ---- Run management ----
            PipelineError::RunInFlight => {
                write!(f, "A model run is already in flight; wait for it to finish.")
            }
            PipelineError::SessionPoisoned => {
                write!(f, "The session state is unavailable because a run panicked.")
            }
            PipelineError::Worker { reason } => {
                write!(f, "The background run ended without a result: {reason}")
            }
        }
    }
}

// ---- Conversions from upstream error types --------------------------------

impl From<LoadError> for PipelineError {
    fn from(err: LoadError) -> Self {
        PipelineError::Load { source: err }
    }
}

impl From<InputError> for PipelineError {
    fn from(err: InputError) -> Self {
        PipelineError::Input { source: err }
    }
}

impl From<PartitionError> for PipelineError {
    fn from(err: PartitionError) -> Self {
        PipelineError::Partition { source: err }
    }
}

impl From<DomainError> for PipelineError {
    fn from(err: DomainError) -> Self {
        PipelineError::Domain { source: err }
    }
}

impl From<ModelError> for PipelineError {
    fn from(err: ModelError) -> Self {
        PipelineError::Model { source: err }
    }
}
