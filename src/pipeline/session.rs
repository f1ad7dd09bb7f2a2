//! Single-writer session state retained across runs.
//!
//! Purpose
//! -------
//! Hold what outlives an individual run: the most recent fit summary, the
//! training partition it was fitted on, the most recent evaluation report,
//! and the stage the active run is in. Only the active run's task writes
//! here; readers between runs see the last committed values.
//!
//! Key behaviors
//! -------------
//! - A fit is committed the moment it succeeds, before evaluation and
//!   diagnostics run, so a later failure leaves the fit queryable.
//! - The evaluation report is committed only when the whole sequence
//!   succeeds.
//! - The stage walks `Idle → Partitioning → BuildingDomain → Fitting →
//!   Evaluating → Diagnostics → Idle` and ends `Idle` on failure too.
//!
//! Invariants & assumptions
//! ------------------------
//! - Readers must tolerate absent values: every retained field is `None`
//!   until the first run commits it.
//! - Mutual exclusion of runs (enforced by the orchestrator) is what makes
//!   the single-writer claim hold; this type does no locking of its own.
use crate::{
    events::partition::EventCollection,
    model::capability::FitSummary,
    pipeline::report::EvaluationReport,
};

/// Stage of the run sequence the active run is executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    /// No run is active.
    Idle,
    /// Splitting the catalog into training and evaluation collections.
    Partitioning,
    /// Buffering the road network into the admissible domain.
    BuildingDomain,
    /// Running the optimizer.
    Fitting,
    /// Scoring the held-out events.
    Evaluating,
    /// Building and rendering the diagnostic artifacts.
    Diagnostics,
}

/// `Session` — retained state between runs.
///
/// Purpose
/// -------
/// The process-wide memory of the pipeline: what was fitted last, on which
/// training partition, and what it scored.
///
/// Invariants
/// ----------
/// - `fit` and `training` are committed together.
#[derive(Debug, Clone)]
pub struct Session {
    stage: RunStage,
    fit: Option<FitSummary>,
    training: Option<EventCollection>,
    report: Option<EvaluationReport>,
}

impl Session {
    /// An idle session with nothing retained.
    pub fn new() -> Session {
        Session { stage: RunStage::Idle, fit: None, training: None, report: None }
    }

    /// Stage of the active run, `Idle` between runs.
    pub fn stage(&self) -> RunStage {
        self.stage
    }

    /// Most recent committed fit, if any run has succeeded that far.
    pub fn fit(&self) -> Option<&FitSummary> {
        self.fit.as_ref()
    }

    /// Training partition of the most recent committed fit.
    pub fn training(&self) -> Option<&EventCollection> {
        self.training.as_ref()
    }

    /// Most recent completed evaluation report.
    pub fn report(&self) -> Option<&EvaluationReport> {
        self.report.as_ref()
    }

    pub(crate) fn set_stage(&mut self, stage: RunStage) {
        self.stage = stage;
    }

    pub(crate) fn commit_fit(&mut self, fit: FitSummary, training: EventCollection) {
        self.fit = Some(fit);
        self.training = Some(training);
    }

    pub(crate) fn commit_report(&mut self, report: EvaluationReport) {
        self.report = Some(report);
    }
}

impl Default for Session {
    fn default() -> Session {
        Session::new()
    }
}
