//! roadhawkes — spatio-temporal Hawkes pipeline for road-constrained crime events.
//!
//! Purpose
//! -------
//! Prepare geospatial crime-event and road-network data for a self-exciting
//! point-process model, validate the user-supplied temporal windows and fit
//! hyperparameters, drive the fit, and score predictive quality on a
//! held-out period.
//!
//! Key behaviors
//! -------------
//! - Load events and road geometry from GeoJSON, reprojecting to WGS84 and
//!   validating the event schema and date format ([`events`]).
//! - Validate window dates and fit parameters at construction, so a value
//!   that exists satisfies its invariants ([`inputs`]).
//! - Split events into training and evaluation collections on a shared
//!   day-offset axis anchored at the earliest training record
//!   ([`events::partition`]).
//! - Buffer the road network into the admissible spatial domain
//!   ([`spatial`]).
//! - Fit a MAP Hawkes model behind the [`InferenceEngine`] seam, score the
//!   held-out events, and render four diagnostic SVGs ([`model`], [`optim`]).
//! - Sequence one run end to end — partition, domain, fit, evaluation,
//!   diagnostics — with single-writer session retention and
//!   one-run-at-a-time submission ([`pipeline`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - All validation happens eagerly, before any expensive computation; a
//!   failed validation commits no state.
//! - A run's first failing step is its single terminal error; a successful
//!   fit committed before the failure stays queryable in the session.
//! - Event dates use the day-first `%d/%m/%Y` format; coordinates are WGS84
//!   degrees after loading.
//!
//! Conventions
//! -----------
//! - Each layer owns its error enum; the orchestration layer folds them
//!   into [`PipelineError`](pipeline::PipelineError) via `From`.
//! - Modules re-export their primary surface from their `mod.rs`, so
//!   downstream code imports from the layer, not the file.
//! - No panics or `unsafe` in library code; fallible paths return
//!   `Result` throughout.
//!
//! Downstream usage
//! ----------------
//! - The `roadhawkes` binary (feature `cli`) loads the files, resolves the
//!   window, and runs the pipeline synchronously.
//! - Library callers construct an
//!   [`Orchestrator`](pipeline::Orchestrator) over a
//!   [`HawkesEngine`](model::HawkesEngine) (or their own engine) and call
//!   `run` or `submit_run`.
//!
//! Testing notes
//! -------------
//! - Each module carries its own unit tests; end-to-end scenarios over
//!   GeoJSON fixtures live in `tests/integration_pipeline.rs`.
//!
//! [`InferenceEngine`]: model::InferenceEngine

pub mod events;
pub mod inputs;
pub mod model;
pub mod optim;
pub mod pipeline;
pub mod spatial;
