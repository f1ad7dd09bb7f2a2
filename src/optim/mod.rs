//! optim — argmin-powered fixed-step MAP optimizer.
//!
//! Purpose
//! -------
//! Provide the optimization layer for **maximizing log-posteriors** `ℓ(θ)`.
//! Models implement a single trait, [`LogPosterior`], and invoke
//! [`maximize_posterior`] to run constant-rate gradient ascent with a
//! finite-difference fallback and full parameter tracing.
//!
//! Key behaviors
//! -------------
//! - Convert model objectives `ℓ(θ)` into Argmin-compatible cost functions
//!   `c(θ) = -ℓ(θ)` via [`adapter::MapAdapter`].
//! - Expose a single entrypoint [`maximize_posterior`] that:
//!   - validates the initial guess with [`LogPosterior::check`],
//!   - runs the Landweber solver (exactly fixed-step gradient descent on
//!     the cost) for the configured step budget via [`run::run_fixed_step`],
//!   - records every iterate through [`trace::TraceRecorder`], and
//!   - normalizes results into an [`AscentOutcome`].
//! - Centralize configuration ([`AscentOptions`]), validation
//!   ([`validation`]), and stable transforms ([`stability`]) so downstream
//!   code can assume sane, finite inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** an objective `ℓ(θ)` by minimizing
//!   a cost `c(θ) = -ℓ(θ)`; model code implements `ℓ(θ)` and `∇ℓ(θ)` (when
//!   available), **never** the cost directly.
//! - [`LogPosterior::value`] and [`LogPosterior::grad`] must treat invalid
//!   inputs as recoverable [`OptimError`] values, not panics.
//! - The solver runs for exactly the configured number of steps; there is
//!   no tolerance-based stopping rule. Step-size selection is the caller's
//!   responsibility.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained optimizer space as [`Theta`]
//!   (`Array1<f64>`). Any mapping from constrained → unconstrained space
//!   happens in the model layer, with [`stability`] providing the guarded
//!   transforms.
//! - Errors bubble up as [`OptimResult<T>`] / [`OptimError`]; this module
//!   and its children never intentionally panic or use `unsafe`.
//!
//! Downstream usage
//! ----------------
//! - The model layer implements [`LogPosterior`] for its MAP objective,
//!   then calls [`maximize_posterior`] with an initial vector, a data
//!   payload, and [`AscentOptions`] derived from the run configuration.
//! - Diagnostics consume [`AscentOutcome::trace`] for per-parameter
//!   convergence plots.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover sign conventions and FD fallback
//!   ([`adapter`]), trace recording ([`trace`]), end-to-end convergence on
//!   toy objectives ([`run`], [`api`]), configuration and outcome
//!   invariants ([`traits`]), and the guarded transforms ([`stability`]).

pub mod adapter;
pub mod api;
pub mod errors;
pub mod run;
pub mod stability;
pub mod trace;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize_posterior;
pub use self::errors::{OptimError, OptimResult};
pub use self::stability::{safe_logistic, safe_logit, BOUNDARY_EPS};
pub use self::trace::ParameterTrace;
pub use self::traits::{AscentOptions, AscentOutcome, LogPosterior};
pub use self::types::{Cost, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream code ---------------------
//
// Downstream code can write
//
//     use roadhawkes::optim::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize_posterior;
    pub use super::errors::{OptimError, OptimResult};
    pub use super::traits::{AscentOptions, AscentOutcome, LogPosterior};
    pub use super::types::{Cost, Grad, Theta};
}
