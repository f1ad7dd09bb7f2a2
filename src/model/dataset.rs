//! Model-ready `{t, x, y}` datasets.
//!
//! Purpose
//! -------
//! Hold the three parallel arrays the point-process likelihood consumes:
//! event times on the day-offset axis and planar coordinates in degrees.
//! Construction validates the arrays once so the likelihood code can index
//! freely without re-checking.
//!
//! Key behaviors
//! -------------
//! - [`ModelDataset::new`] enforces equal lengths, finite values, and
//!   ascending times; an empty dataset is legal (held-out sets may be
//!   empty, judged at evaluation time).
//! - [`ModelDataset::from_collection`] assembles the triple arrays from a
//!   partitioned [`EventCollection`].
//! - [`ModelDataset::merged_with`] concatenates a strictly later dataset
//!   onto this one, revalidating the joint ordering; evaluation uses this
//!   to treat training history and earlier test events as one exciting set.
//!
//! Invariants & assumptions
//! ------------------------
//! - `times` is ascending (ties allowed: same-day events share an offset).
//! - All values are finite; all three arrays have the same length.
//!
//! Downstream usage
//! ----------------
//! - The likelihood internals (`model::intensity`) and diagnostics iterate
//!   these arrays directly.
use crate::{
    events::partition::EventCollection,
    model::errors::{ModelError, ModelResult},
};
use ndarray::Array1;

/// `ModelDataset` — validated parallel `{t, x, y}` arrays.
///
/// Purpose
/// -------
/// The model's view of an event set: times in fractional days since the
/// partition origin, coordinates in WGS84 degrees.
///
/// Invariants
/// ----------
/// - Equal lengths, finite entries, `times` ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDataset {
    times: Array1<f64>,
    xs: Array1<f64>,
    ys: Array1<f64>,
}

impl ModelDataset {
    /// Build a validated dataset from the three arrays.
    ///
    /// Parameters
    /// ----------
    /// - `times`: `Array1<f64>`
    ///   Event times, ascending (ties allowed).
    /// - `xs`, `ys`: `Array1<f64>`
    ///   Matching coordinates.
    ///
    /// Returns
    /// -------
    /// `ModelResult<ModelDataset>`
    ///   - `Ok(dataset)`, possibly empty.
    ///   - `Err(ModelError::LengthMismatch)` when the arrays disagree in
    ///     length.
    ///   - `Err(ModelError::NonFiniteValue)` naming the array and index of
    ///     the first NaN or infinity.
    ///   - `Err(ModelError::UnsortedTimes)` at the first descending step.
    ///
    /// Panics
    /// ------
    /// - Never panics.
    pub fn new(times: Array1<f64>, xs: Array1<f64>, ys: Array1<f64>) -> ModelResult<ModelDataset> {
        if times.len() != xs.len() || times.len() != ys.len() {
            return Err(ModelError::LengthMismatch {
                times: times.len(),
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        for (what, array) in [("time", &times), ("x coordinate", &xs), ("y coordinate", &ys)] {
            for (index, &value) in array.iter().enumerate() {
                if !value.is_finite() {
                    return Err(ModelError::NonFiniteValue { what, index, value });
                }
            }
        }
        for index in 1..times.len() {
            if times[index] < times[index - 1] {
                return Err(ModelError::UnsortedTimes { index });
            }
        }
        Ok(ModelDataset { times, xs, ys })
    }

    /// Assemble the triple arrays from a partitioned collection.
    ///
    /// Times are the collection's day offsets; `x` is longitude and `y` is
    /// latitude. The collection's own invariants make this infallible in
    /// practice, but the validation still runs.
    pub fn from_collection(collection: &EventCollection) -> ModelResult<ModelDataset> {
        let times = collection.offsets().clone();
        let xs = collection.records().iter().map(|record| record.lon).collect::<Array1<f64>>();
        let ys = collection.records().iter().map(|record| record.lat).collect::<Array1<f64>>();
        ModelDataset::new(times, xs, ys)
    }

    /// Concatenate a later dataset onto this one.
    ///
    /// The result passes through the same validation as [`new`], so a
    /// `later` set that starts before this one ends is rejected with
    /// [`ModelError::UnsortedTimes`].
    ///
    /// [`new`]: ModelDataset::new
    pub fn merged_with(&self, later: &ModelDataset) -> ModelResult<ModelDataset> {
        let chain = |a: &Array1<f64>, b: &Array1<f64>| {
            a.iter().chain(b.iter()).copied().collect::<Array1<f64>>()
        };
        ModelDataset::new(
            chain(&self.times, &later.times),
            chain(&self.xs, &later.xs),
            chain(&self.ys, &later.ys),
        )
    }

    /// Event times in fractional days, ascending.
    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    /// Longitudes in degrees, parallel to [`times`](ModelDataset::times).
    pub fn xs(&self) -> &Array1<f64> {
        &self.xs
    }

    /// Latitudes in degrees, parallel to [`times`](ModelDataset::times).
    pub fn ys(&self) -> &Array1<f64> {
        &self.ys
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the dataset holds no events.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// First and last event times, or `None` when empty.
    pub fn time_span(&self) -> Option<(f64, f64)> {
        match (self.times.first(), self.times.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        }
    }
}
