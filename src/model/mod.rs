//! model — spatio-temporal Hawkes process and its diagnostics.
//!
//! Purpose
//! -------
//! Fit a self-exciting point process to the partitioned events over the
//! admissible road-network domain, score held-out events, and explain the
//! fit. The layer is split into validated inputs ([`dataset`], [`params`],
//! [`priors`]), pure likelihood math ([`intensity`]), the engine seam
//! ([`capability`]) with its concrete implementation ([`hawkes`]), and the
//! post-fit artifacts ([`diagnostics`], [`render`]).
//!
//! Key behaviors
//! -------------
//! - [`ModelDataset`] validates the `{t, x, y}` arrays once at the
//!   boundary; everything downstream indexes them freely.
//! - [`HawkesParams`] owns the natural ↔ unconstrained θ mapping so the
//!   optimizer only ever sees finite real vectors.
//! - [`HawkesEngine`] drives the MAP ascent through the [`optim`] layer,
//!   commits fitted state on success, and answers the evaluation and
//!   diagnostic queries behind the [`InferenceEngine`] trait.
//! - [`render::render_all`] turns a [`DiagnosticSet`] into four SVG files.
//!
//! Invariants & assumptions
//! ------------------------
//! - The intensity model: `λ(t, s) = μ₀ + Σ_{t_j < t} α β e^{−β (t − t_j)}
//!   N₂(s − s_j; σ²)` with uniform background `μ₀ = exp(a₀) / |A|` over the
//!   admissible area. Simultaneous events never excite each other.
//! - Dataset times are fractional days since the partition origin;
//!   coordinates are WGS84 degrees.
//! - The spatial kernel's mass over the domain is treated as unity in the
//!   compensator; a kernel centered well inside the domain loses little.
//!
//! Conventions
//! -----------
//! - Errors bubble up as [`ModelResult<T>`] / [`ModelError`]; optimizer
//!   failures arrive wrapped in [`ModelError::Optimization`].
//!
//! Downstream usage
//! ----------------
//! - The pipeline layer holds an [`InferenceEngine`] and calls `fit`,
//!   `log_expected_likelihood`, `expected_aic`, and `render_diagnostics`
//!   in the run sequence.
//!
//! Testing notes
//! -------------
//! - Likelihood terms are checked against hand-computed values
//!   ([`intensity`]); the engine lifecycle, rejection paths, and state
//!   retention live in [`hawkes`]; artifact presence in [`render`].
//!
//! [`optim`]: crate::optim

pub mod capability;
pub mod dataset;
pub mod diagnostics;
pub mod errors;
pub mod hawkes;
pub mod intensity;
pub mod params;
pub mod priors;
pub mod render;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::capability::{FitSummary, InferenceEngine};
pub use self::dataset::ModelDataset;
pub use self::diagnostics::DiagnosticSet;
pub use self::errors::{ModelError, ModelResult};
pub use self::hawkes::{HawkesEngine, HawkesObjective};
pub use self::params::{HawkesParams, NUM_PARAMS};
pub use self::priors::PriorSet;
