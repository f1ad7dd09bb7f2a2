//! Unified error surface for the gradient-ascent optimizer.
//!
//! Everything that can go wrong between "caller hands over an objective"
//! and "fitted parameters come back" is an [`OptimError`]: configuration
//! mistakes, gradient problems, non-finite objective values, backend solver
//! failures, and invalid final states. Backend errors are recovered from
//! `argmin`'s dynamic error type via downcasting, so objective-level
//! failures round-trip through the solver without losing their identity.
use crate::model::errors::ModelError;
use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptimResult<T> = Result<T, OptimError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptimError {
    // ---- Gradient ----
    /// Implies that finite differences should be used.
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch { expected: usize, found: usize },

    /// Gradient elements need to be finite.
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- Ascent configuration ----
    /// Learning rate needs to be positive and finite.
    InvalidLearningRate { value: f64, reason: &'static str },

    /// The iteration budget needs to be at least one step.
    InvalidStepBudget { steps: u64, reason: &'static str },

    // ---- Objective ----
    /// Objective returned a non-finite value.
    NonFiniteCost { value: f64 },

    /// Parameter vector length does not match what the objective expects.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Initial parameter vector must have finite values.
    InvalidThetaInput { index: usize, value: f64 },

    /// Initial parameter vector must not be empty.
    EmptyTheta,

    /// The objective failed for a model-level reason.
    ObjectiveFailure { reason: String },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Final parameter vector is missing from the solver state.
    MissingThetaHat,

    /// The parameter trace mutex was poisoned by a panicking observer.
    TracePoisoned,

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError { text: String },
    /// Wrapper for other argmin::Error types
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptimError {}

impl std::fmt::Display for OptimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptimError::GradientNotImplemented => {
                write!(f, "Analytic gradient not implemented")
            }
            OptimError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptimError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- Ascent configuration ----
            OptimError::InvalidLearningRate { value, reason } => {
                write!(f, "Invalid learning rate {value}: {reason}")
            }
            OptimError::InvalidStepBudget { steps, reason } => {
                write!(f, "Invalid step budget {steps}: {reason}")
            }

            // ---- Objective ----
            OptimError::NonFiniteCost { value } => {
                write!(f, "Non-finite objective value: {value}")
            }
            OptimError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptimError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            OptimError::EmptyTheta => {
                write!(f, "Initial parameter vector is empty")
            }
            OptimError::ObjectiveFailure { reason } => {
                write!(f, "Objective evaluation failed: {reason}")
            }

            // ---- Optimizer outcome ----
            OptimError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptimError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }
            OptimError::TracePoisoned => {
                write!(f, "Parameter trace is unavailable: its lock was poisoned")
            }

            // ---- Argmin ----
            OptimError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptimError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptimError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptimError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptimError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptimError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptimError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptimError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptimError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptimError {
    fn from(original_err: Error) -> Self {
        // Objective-level errors cross the argmin boundary boxed; recover
        // them intact before falling back to the backend taxonomy.
        let original_err = match original_err.downcast::<OptimError>() {
            Ok(optim_err) => return optim_err,
            Err(other) => other,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptimError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptimError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptimError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptimError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptimError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptimError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptimError::ImpossibleError { text },
                _ => OptimError::UnknownError,
            },
            Err(err) => OptimError::BackendError { text: err.to_string() },
        }
    }
}

impl From<ModelError> for OptimError {
    fn from(err: ModelError) -> Self {
        OptimError::ObjectiveFailure { reason: err.to_string() }
    }
}
