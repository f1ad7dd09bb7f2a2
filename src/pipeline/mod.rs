//! pipeline — run orchestration and session state.
//!
//! Purpose
//! -------
//! Sequence one model run end to end — partition, spatial domain, fit,
//! evaluation, diagnostics — against any [`InferenceEngine`], with
//! single-writer session retention and one-run-at-a-time submission.
//!
//! Key behaviors
//! -------------
//! - [`Orchestrator::run`] executes the sequence synchronously;
//!   [`Orchestrator::submit_run`] moves it onto one background thread and
//!   returns a [`RunHandle`] for waiting or polling.
//! - The first failing step is the run's single terminal error
//!   ([`PipelineError`]); a successful fit survives later failures in the
//!   session.
//! - [`EvaluationReport`]'s `Display` is the user-facing two-line summary.
//!
//! Invariants & assumptions
//! ------------------------
//! - At most one run is active at a time; submissions during a run are
//!   rejected, never queued.
//! - Only the active run's task writes the [`Session`]; readers between
//!   runs tolerate absent values.
//!
//! Downstream usage
//! ----------------
//! - The CLI builds an [`Orchestrator`] over the Hawkes engine, runs
//!   synchronously, and prints the [`RunReport`].
//!
//! Testing notes
//! -------------
//! - Orchestrator tests script a stub engine; end-to-end coverage with the
//!   real engine lives in the integration suite.
//!
//! [`InferenceEngine`]: crate::model::capability::InferenceEngine

pub mod errors;
pub mod orchestrator;
pub mod report;
pub mod session;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{PipelineError, PipelineResult};
pub use self::orchestrator::{Orchestrator, RunHandle};
pub use self::report::{EvaluationReport, RunOptions, RunReport};
pub use self::session::{RunStage, Session};
