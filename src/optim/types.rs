//! optim::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and the solver alias used by the posterior
//! optimizer. The rest of the optimization code imports these instead of
//! spelling out `ndarray` containers and Argmin generics, which keeps the
//! backend swappable in one place.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are conceptually column vectors with length equal
//!   to the number of free parameters.
//! - `Cost` is the scalar the solver minimizes: `c(θ) = -ℓ(θ)` for a
//!   log-posterior `ℓ`; higher layers handle the sign flip.
//! - The solver alias pins Argmin's six-slot `IterState` shape as of the
//!   pinned Argmin version.
use argmin::{core::IterState, solver::landweber::Landweber};
use ndarray::Array1;
use std::collections::HashMap;

/// Parameter vector `θ` in the unconstrained optimizer space.
///
/// Alias for `ndarray::Array1<f64>`, used as the canonical parameter type
/// throughout the optimizer.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)`.
///
/// Alias for `ndarray::Array1<f64>`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Scalar objective value used by the solver.
///
/// In this crate, this is the cost `c(θ) = -ℓ(θ)` derived from a
/// log-posterior `ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"gradient_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Fixed-step gradient solver specialized to this crate's float type.
///
/// Landweber iteration is exactly constant-rate gradient descent on the
/// cost, i.e. gradient *ascent* on the log-posterior:
/// `θ_{k+1} = θ_k - ω ∇c(θ_k)`.
pub type FixedStep = Landweber<f64>;

/// Solver iteration state specialized to this crate's numeric shapes.
pub type AscentState = IterState<Theta, Grad, (), (), (), f64>;
