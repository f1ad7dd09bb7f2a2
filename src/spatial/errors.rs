//! Errors for spatial domain construction (margin validation, degeneracy
//! checks, and grid sampling).
//!
//! ## Conventions
//! - The buffer margin is expressed in the same units as the geometry
//!   (degrees for WGS84 input) and must be strictly positive and finite.
//! - A domain whose buffered area is empty, zero, or non-finite is
//!   *degenerate* and unusable for intensity normalization.

/// Result alias for domain operations that may produce [`DomainError`].
pub type DomainResult<T> = Result<T, DomainError>;

/// Unified error type for spatial domain construction and sampling.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The buffer margin is non-positive or non-finite.
    NonPositiveMargin { value: f64 },

    /// The road network has no line or polygon features.
    EmptyNetwork,

    /// Buffering produced an empty or non-finite admissible region.
    DegenerateArea { value: f64 },

    /// Grid sampling was requested with zero cells per axis.
    InvalidGridResolution { value: usize },
}

impl std::error::Error for DomainError {}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::NonPositiveMargin { value } => {
                write!(f, "Buffer margin must be finite and > 0; got: {value}")
            }
            DomainError::EmptyNetwork => {
                write!(f, "Road network has no line or polygon features.")
            }
            DomainError::DegenerateArea { value } => {
                write!(f, "Buffered admissible region is degenerate; area: {value}")
            }
            DomainError::InvalidGridResolution { value } => {
                write!(f, "Grid resolution must be at least 1 cell per axis; got: {value}")
            }
        }
    }
}
