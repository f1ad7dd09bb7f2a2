//! Run sequencing, mutual exclusion, and the background worker.
//!
//! Purpose
//! -------
//! Drive one full run — partition, domain, fit, evaluation, diagnostics —
//! against an [`InferenceEngine`], either synchronously on the caller's
//! thread ([`Orchestrator::run`]) or on a dedicated background thread
//! ([`Orchestrator::submit_run`]). At most one run is active at a time.
//!
//! Key behaviors
//! -------------
//! - The sequence is a strict linear order; the first failing step aborts
//!   the remainder and becomes the run's single terminal error.
//! - A successful fit is committed to the [`Session`] immediately, before
//!   evaluation and diagnostics, so later failures leave it queryable.
//! - Mutual exclusion is an atomic compare-exchange on an in-flight flag;
//!   a second submission while a run is active is rejected with
//!   [`PipelineError::RunInFlight`], never queued or interleaved.
//! - The flag is cleared on every exit path, panics included, by a drop
//!   guard that travels with the run.
//! - There is no cancellation and no timeout: a submitted run always
//!   proceeds to completion or error.
//!
//! Invariants & assumptions
//! ------------------------
//! - Single-writer sessions: only the active run's task writes session
//!   state, and the in-flight flag keeps two runs from coexisting.
//! - The session stage ends `Idle` on success and on failure.
//! - File loads happen on the caller's path; the orchestrator takes loaded
//!   catalogs and networks, never paths.
//!
//! Downstream usage
//! ----------------
//! - The CLI calls [`Orchestrator::run`] synchronously; interactive hosts
//!   call [`Orchestrator::submit_run`] and poll the returned
//!   [`RunHandle`].
//!
//! Testing notes
//! -------------
//! - Tests drive a scripted stub engine through the sequence: commitment
//!   ordering, fit retention after evaluation failures, the in-flight
//!   rejection, and handle polling. End-to-end runs with the real engine
//!   live in the integration suite.
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Receiver},
    Arc, Mutex,
};
use std::thread::{self, JoinHandle};

use tracing::info;

use crate::{
    events::{catalog::EventCatalog, partition::partition},
    inputs::{params::FitConfig, window::TemporalWindow},
    model::{capability::InferenceEngine, dataset::ModelDataset},
    pipeline::{
        errors::{PipelineError, PipelineResult},
        report::{EvaluationReport, RunOptions, RunReport},
        session::{RunStage, Session},
    },
    spatial::{domain::SpatialDomain, network::RoadNetwork},
};

// Clears the in-flight flag when the run ends, panics included.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// `Orchestrator` — owns the engine and the session, runs the sequence.
///
/// Purpose
/// -------
/// The single entry point for model runs. Cloning is cheap and shares the
/// engine, session, and in-flight flag, which is how the background worker
/// sees the same state as the caller.
pub struct Orchestrator<E> {
    engine: Arc<Mutex<E>>,
    session: Arc<Mutex<Session>>,
    in_flight: Arc<AtomicBool>,
}

impl<E> Clone for Orchestrator<E> {
    fn clone(&self) -> Orchestrator<E> {
        Orchestrator {
            engine: Arc::clone(&self.engine),
            session: Arc::clone(&self.session),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<E: InferenceEngine> Orchestrator<E> {
    /// Wrap an engine with a fresh idle session.
    pub fn new(engine: E) -> Orchestrator<E> {
        Orchestrator {
            engine: Arc::new(Mutex::new(engine)),
            session: Arc::new(Mutex::new(Session::new())),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Snapshot of the retained session state.
    ///
    /// Errors
    /// ------
    /// - `PipelineError::SessionPoisoned` if a run panicked while holding
    ///   the session lock.
    pub fn session(&self) -> PipelineResult<Session> {
        let session = self.session.lock().map_err(|_| PipelineError::SessionPoisoned)?;
        Ok(session.clone())
    }

    /// Run the full sequence synchronously on the caller's thread.
    ///
    /// # Steps
    /// 1. Partition the catalog with the window.
    /// 2. Build the spatial domain from the roads and the margin option.
    /// 3. Fit on the training dataset; commit the fit on success.
    /// 4. Score the evaluation dataset (likelihood, then AIC).
    /// 5. Render the four diagnostics into the output directory.
    /// 6. Commit the evaluation report and return the run report.
    ///
    /// Returns
    /// -------
    /// `PipelineResult<RunReport>`
    ///   The committed report, or the first failing step's error.
    ///
    /// Errors
    /// ------
    /// - `PipelineError::RunInFlight` when another run is active.
    /// - Any wrapped upstream error from the failing step.
    pub fn run(
        &self, catalog: &EventCatalog, roads: &RoadNetwork, window: &TemporalWindow,
        config: &FitConfig, options: &RunOptions,
    ) -> PipelineResult<RunReport> {
        let _guard = self.claim()?;
        let outcome = self.sequence(catalog, roads, window, config, options);
        self.finish(outcome)
    }

    /// Run the full sequence on one dedicated background thread.
    ///
    /// The inputs move into the worker; the outcome arrives through the
    /// returned [`RunHandle`]. While the run is in flight, further
    /// submissions fail with `PipelineError::RunInFlight`.
    ///
    /// Errors
    /// ------
    /// - `PipelineError::RunInFlight` when another run is active.
    /// - `PipelineError::Worker` when the thread cannot be spawned.
    pub fn submit_run(
        &self, catalog: EventCatalog, roads: RoadNetwork, window: TemporalWindow,
        config: FitConfig, options: RunOptions,
    ) -> PipelineResult<RunHandle>
    where
        E: Send + 'static,
    {
        let guard = self.claim()?;
        let worker = self.clone();
        let (sender, receiver) = mpsc::sync_channel(1);
        let handle = thread::Builder::new()
            .name("roadhawkes-run".to_string())
            .spawn(move || {
                let _guard = guard;
                let outcome = worker.sequence(&catalog, &roads, &window, &config, &options);
                let outcome = worker.finish(outcome);
                // A caller may have dropped the handle; nothing to do then.
                let _ = sender.send(outcome);
            })
            .map_err(|_| PipelineError::Worker {
                reason: "the worker thread could not be spawned",
            })?;
        info!("run submitted to background worker");
        Ok(RunHandle { receiver, handle, outcome: None })
    }

    // Claim the in-flight flag, rejecting when a run is already active.
    fn claim(&self) -> PipelineResult<InFlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PipelineError::RunInFlight)?;
        Ok(InFlightGuard { flag: Arc::clone(&self.in_flight) })
    }

    // The strict linear run sequence. Stage bookkeeping happens here; the
    // in-flight flag and the final Idle reset are the callers' concern.
    fn sequence(
        &self, catalog: &EventCatalog, roads: &RoadNetwork, window: &TemporalWindow,
        config: &FitConfig, options: &RunOptions,
    ) -> PipelineResult<RunReport> {
        self.set_stage(RunStage::Partitioning)?;
        let (training, evaluation) = partition(catalog, window)?;

        self.set_stage(RunStage::BuildingDomain)?;
        let domain = SpatialDomain::build(roads, options.margin)?;

        self.set_stage(RunStage::Fitting)?;
        let train_set = ModelDataset::from_collection(&training)?;
        let summary = {
            let mut engine = self.engine.lock().map_err(|_| PipelineError::SessionPoisoned)?;
            engine.fit(&train_set, &domain, config)?
        };
        info!(
            events = summary.num_events,
            iterations = summary.iterations,
            status = %summary.status,
            "fit committed"
        );
        self.with_session(|session| session.commit_fit(summary.clone(), training.clone()))?;

        self.set_stage(RunStage::Evaluating)?;
        let eval_set = ModelDataset::from_collection(&evaluation)?;
        let evaluation_report = {
            let engine = self.engine.lock().map_err(|_| PipelineError::SessionPoisoned)?;
            EvaluationReport {
                log_expected_likelihood: engine.log_expected_likelihood(&eval_set)?,
                expected_aic: engine.expected_aic()?,
            }
        };

        self.set_stage(RunStage::Diagnostics)?;
        let artifacts = {
            let engine = self.engine.lock().map_err(|_| PipelineError::SessionPoisoned)?;
            engine.render_diagnostics(&options.out_dir, options.grid_resolution)?
        };

        self.with_session(|session| session.commit_report(evaluation_report))?;
        info!(artifacts = artifacts.len(), "run complete");
        Ok(RunReport {
            fit: summary,
            evaluation: evaluation_report,
            artifacts,
            training_events: training.len(),
            evaluation_events: evaluation.len(),
        })
    }

    // Reset the stage to Idle on both outcomes, without masking the run's
    // own error.
    fn finish(&self, outcome: PipelineResult<RunReport>) -> PipelineResult<RunReport> {
        match self.set_stage(RunStage::Idle) {
            Ok(()) => outcome,
            Err(reset_err) => outcome.and(Err(reset_err)),
        }
    }

    fn set_stage(&self, stage: RunStage) -> PipelineResult<()> {
        self.with_session(|session| session.set_stage(stage))
    }

    fn with_session<T>(&self, apply: impl FnOnce(&mut Session) -> T) -> PipelineResult<T> {
        let mut session = self.session.lock().map_err(|_| PipelineError::SessionPoisoned)?;
        Ok(apply(&mut session))
    }
}

/// `RunHandle` — one background run's outcome channel.
///
/// Purpose
/// -------
/// Let the caller either block until the run finishes ([`RunHandle::wait`])
/// or poll between other work ([`RunHandle::try_report`]).
pub struct RunHandle {
    receiver: Receiver<PipelineResult<RunReport>>,
    handle: JoinHandle<()>,
    outcome: Option<PipelineResult<RunReport>>,
}

impl RunHandle {
    /// Block until the run finishes and yield its outcome.
    ///
    /// Joins the worker thread, so the in-flight flag is guaranteed clear
    /// when this returns.
    ///
    /// Errors
    /// ------
    /// - `PipelineError::Worker` when the worker panicked or vanished
    ///   without delivering a result.
    /// - Otherwise, whatever the run itself produced.
    pub fn wait(self) -> PipelineResult<RunReport> {
        let RunHandle { receiver, handle, outcome } = self;
        let outcome = match outcome {
            Some(outcome) => outcome,
            None => match receiver.recv() {
                Ok(outcome) => outcome,
                Err(_) => {
                    // No result will ever arrive; joining tells us why.
                    return match handle.join() {
                        Ok(()) => Err(PipelineError::Worker {
                            reason: "the channel closed before a result arrived",
                        }),
                        Err(_) => Err(PipelineError::Worker { reason: "the run panicked" }),
                    };
                }
            },
        };
        handle
            .join()
            .map_err(|_| PipelineError::Worker { reason: "the run panicked" })?;
        outcome
    }

    /// Poll for the outcome without blocking.
    ///
    /// Returns `None` while the run is still in flight. Once the outcome
    /// has arrived it stays available to repeated polls; [`RunHandle::wait`]
    /// afterwards still joins the worker.
    pub fn try_report(&mut self) -> Option<&PipelineResult<RunReport>> {
        if self.outcome.is_none() {
            if let Ok(outcome) = self.receiver.try_recv() {
                self.outcome = Some(outcome);
            }
        }
        self.outcome.as_ref()
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
