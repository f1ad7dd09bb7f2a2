//! Parameter-trace recording via an `argmin` observer.
//!
//! Purpose
//! -------
//! Capture the parameter vector after every solver iteration so diagnostics
//! can plot per-parameter convergence paths. The recorder is attached to
//! the executor as an observer; a clone of its shared handle stays with the
//! runner, which drains it into an immutable [`ParameterTrace`] once the
//! run finishes.
//!
//! Key behaviors
//! -------------
//! - [`TraceRecorder::new`] seeds the history with θ₀, so a finished trace
//!   always has `iterations + 1` rows.
//! - [`TraceRecorder`] implements `Observe` for any state whose parameter
//!   type is [`Theta`]; it records on `observe_iter` only.
//! - [`ParameterTrace::matrix`] lays the history out as an
//!   `(iterations + 1) × dim` array, one row per iterate.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every recorded vector has the same dimension as θ₀ (the solver never
//!   changes parameter dimension mid-run).
//! - The shared history lock is only held for a push or the final drain; a
//!   poisoned lock surfaces as [`OptimError::TracePoisoned`].
use crate::optim::{
    errors::{OptimError, OptimResult},
    types::Theta,
};
use argmin::core::{observers::Observe, Error, State, KV};
use ndarray::Array2;
use std::sync::{Arc, Mutex};

/// Immutable record of every iterate visited during one ascent run.
///
/// Row 0 is θ₀; row `k` is the parameter vector after iteration `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTrace {
    history: Vec<Theta>,
    dim: usize,
}

impl ParameterTrace {
    /// Wrap a history of iterates; the dimension is taken from the first
    /// entry (zero for an empty history).
    pub fn new(history: Vec<Theta>) -> ParameterTrace {
        let dim = history.first().map_or(0, |theta| theta.len());
        ParameterTrace { history, dim }
    }

    /// The iterates, oldest first.
    pub fn steps(&self) -> &[Theta] {
        &self.history
    }

    /// Number of recorded iterates (iterations + 1 for a finished run).
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Parameter dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The history as an `len() × dim()` matrix, one row per iterate.
    pub fn matrix(&self) -> Array2<f64> {
        let mut out = Array2::zeros((self.history.len(), self.dim));
        for (row, theta) in self.history.iter().enumerate() {
            out.row_mut(row).assign(theta);
        }
        out
    }
}

/// Observer that appends each iterate to a shared history.
///
/// Cloning shares the underlying history: the runner keeps one clone and
/// hands the other to the executor, then drains the shared state via
/// [`TraceRecorder::into_trace`] after the run.
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    history: Arc<Mutex<Vec<Theta>>>,
}

impl TraceRecorder {
    /// Create a recorder seeded with the starting point θ₀.
    pub fn new(theta0: &Theta) -> TraceRecorder {
        TraceRecorder { history: Arc::new(Mutex::new(vec![theta0.clone()])) }
    }

    /// Drain the shared history into an immutable trace.
    ///
    /// # Errors
    /// - [`OptimError::TracePoisoned`] if an observer panicked while
    ///   holding the lock.
    pub fn into_trace(self) -> OptimResult<ParameterTrace> {
        let mut history = self.history.lock().map_err(|_| OptimError::TracePoisoned)?;
        Ok(ParameterTrace::new(std::mem::take(&mut *history)))
    }
}

impl<I> Observe<I> for TraceRecorder
where
    I: State<Param = Theta>,
{
    fn observe_iter(&mut self, state: &I, _kv: &KV) -> Result<(), Error> {
        let Some(param) = state.get_param() else {
            return Ok(());
        };
        match self.history.lock() {
            Ok(mut history) => {
                history.push(param.clone());
                Ok(())
            }
            Err(_) => Err(OptimError::TracePoisoned.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::types::AscentState;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Seeding and recording through the observer interface.
    // - Matrix layout of a finished trace.
    //
    // These tests intentionally DO NOT cover:
    // - Executor wiring (see `optim::run`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the recorder seeds θ₀ and appends each observed state.
    //
    // Given
    // -----
    // - A recorder seeded with [0, 0] and two observed states.
    //
    // Expect
    // ------
    // - A trace of three iterates in order.
    fn recorder_seeds_and_appends() {
        let mut recorder = TraceRecorder::new(&array![0.0, 0.0]);
        let shared = recorder.clone();

        for step in 1..=2 {
            let state: AscentState =
                argmin::core::IterState::new().param(array![step as f64, 0.0]);
            recorder.observe_iter(&state, &KV::new()).unwrap();
        }

        let trace = shared.into_trace().unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.steps()[0], array![0.0, 0.0]);
        assert_eq!(trace.steps()[2], array![2.0, 0.0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify the matrix layout: one row per iterate, one column per
    // parameter.
    //
    // Given
    // -----
    // - A trace of two 3-dimensional iterates.
    //
    // Expect
    // ------
    // - A 2×3 matrix with the iterates as rows.
    fn matrix_lays_out_rows_per_iterate() {
        let trace =
            ParameterTrace::new(vec![array![1.0, 2.0, 3.0], array![4.0, 5.0, 6.0]]);

        let matrix = trace.matrix();

        assert_eq!(matrix.shape(), &[2, 3]);
        assert_eq!(matrix[[0, 1]], 2.0);
        assert_eq!(matrix[[1, 2]], 6.0);
        assert_eq!(trace.dim(), 3);
    }
}
