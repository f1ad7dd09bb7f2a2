//! Catalog partitioning into training and evaluation collections.
//!
//! Purpose
//! -------
//! Split a loaded [`EventCatalog`] along a validated [`TemporalWindow`] and
//! convert civil dates into the model's time axis: fractional days elapsed
//! since the earliest training event. The output collections are sorted,
//! validated, and ready for likelihood evaluation without further checks.
//!
//! Key behaviors
//! -------------
//! - [`partition`] selects by inclusive date bounds on both windows; events
//!   falling between the two windows belong to neither.
//! - The time origin is the minimum date among the selected *training*
//!   records, so the first training offset is exactly zero. Both collections
//!   measure offsets from that origin, which lets the evaluation set be
//!   appended to the training history on a common axis (its offsets exceed
//!   the training span, as the window ordering guarantees).
//! - [`EventCollection::new`] sorts records by offset (stable, so same-day
//!   events keep source order) and rejects negative or non-finite offsets.
//!
//! Invariants & assumptions
//! ------------------------
//! - Offsets are non-negative, finite, and ascending.
//! - `records[i]` and `offsets[i]` describe the same event.
//! - An empty *training* selection is an error here; an empty evaluation
//!   selection is legal and is judged at evaluation time instead.
//!
//! Conventions
//! -----------
//! - One unit of time is one day ([`SECONDS_PER_DAY`] seconds); civil dates
//!   land on whole-day offsets.
//!
//! Downstream usage
//! ----------------
//! - The model layer consumes [`EventCollection`]s directly: offsets become
//!   the event-time vector, record coordinates the location matrix.
//!
//! Testing notes
//! -------------
//! - Unit tests cover offset arithmetic, joint sorting, inclusive bound
//!   selection, the shared origin, and the empty-training error.
use crate::{
    events::{
        catalog::{EventCatalog, EventRecord},
        errors::{PartitionError, PartitionResult},
    },
    inputs::window::TemporalWindow,
};
use chrono::NaiveDate;
use ndarray::Array1;
use tracing::info;

/// Seconds per day; the divisor turning date differences into day offsets.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// `EventCollection` — chronologically sorted events on the day-offset axis.
///
/// Purpose
/// -------
/// Pair each event record with its offset in days since a shared origin,
/// sorted ascending, with the non-negativity and finiteness invariants
/// enforced at construction.
///
/// Fields (internal)
/// -----------------
/// - `records`: events sorted by offset (stable within a day).
/// - `offsets`: matching day offsets, ascending.
/// - `origin`: the civil date offsets are measured from.
///
/// Invariants
/// ----------
/// - `offsets[i]` is finite and `>= 0`; `offsets` is non-decreasing.
/// - `records.len() == offsets.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventCollection {
    records: Vec<EventRecord>,
    offsets: Array1<f64>,
    origin: NaiveDate,
}

impl EventCollection {
    /// Build a sorted, validated collection from records and an origin.
    ///
    /// Parameters
    /// ----------
    /// - `records`: `Vec<EventRecord>`
    ///   Events in any order; may be empty.
    /// - `origin`: `NaiveDate`
    ///   Date that offset zero refers to.
    ///
    /// Returns
    /// -------
    /// `PartitionResult<EventCollection>`
    ///   - `Ok(collection)` with records sorted by offset.
    ///   - `Err(PartitionError::NegativeOffset)` if a record predates the
    ///     origin.
    ///   - `Err(PartitionError::NonFiniteOffset)` if offset arithmetic
    ///     produces a non-finite value.
    ///
    /// Panics
    /// ------
    /// - Never panics.
    pub fn new(records: Vec<EventRecord>, origin: NaiveDate) -> PartitionResult<EventCollection> {
        let mut paired = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let offset = day_offset(record.date, origin);
            if !offset.is_finite() {
                return Err(PartitionError::NonFiniteOffset { index, value: offset });
            }
            if offset < 0.0 {
                return Err(PartitionError::NegativeOffset { date: record.date, origin });
            }
            paired.push((offset, record));
        }
        paired.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut offsets = Vec::with_capacity(paired.len());
        let mut records = Vec::with_capacity(paired.len());
        for (offset, record) in paired {
            offsets.push(offset);
            records.push(record);
        }
        Ok(EventCollection { records, offsets: Array1::from_vec(offsets), origin })
    }

    /// The events, sorted by offset.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Day offsets since [`origin`](EventCollection::origin), ascending.
    pub fn offsets(&self) -> &Array1<f64> {
        &self.offsets
    }

    /// The date offset zero refers to.
    pub fn origin(&self) -> NaiveDate {
        self.origin
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no events.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Split a catalog into training and evaluation collections.
///
/// Purpose
/// -------
/// Select records by the window's inclusive date bounds and express both
/// selections on the day-offset axis anchored at the earliest training
/// record, so the minimum training offset is exactly zero.
///
/// Parameters
/// ----------
/// - `catalog`: `&EventCatalog`
///   Loaded events (any order).
/// - `window`: `&TemporalWindow`
///   Validated training/evaluation bounds.
///
/// Returns
/// -------
/// `PartitionResult<(EventCollection, EventCollection)>`
///   - `Ok((training, evaluation))`; the evaluation collection may be
///     empty.
///   - `Err(PartitionError::EmptyTrainingSet)` when no event falls inside
///     the training window.
///
/// Panics
/// ------
/// - Never panics.
pub fn partition(
    catalog: &EventCatalog, window: &TemporalWindow,
) -> PartitionResult<(EventCollection, EventCollection)> {
    let select = |start: NaiveDate, end: NaiveDate| {
        catalog
            .records()
            .iter()
            .filter(|record| record.date >= start && record.date <= end)
            .cloned()
            .collect::<Vec<_>>()
    };

    let training = select(window.training_start(), window.training_end());
    let origin = training.iter().map(|record| record.date).min().ok_or(
        PartitionError::EmptyTrainingSet {
            start: window.training_start(),
            end: window.training_end(),
        },
    )?;
    let evaluation = select(window.test_start(), window.test_end());

    let training = EventCollection::new(training, origin)?;
    let evaluation = EventCollection::new(evaluation, origin)?;
    info!(training = training.len(), evaluation = evaluation.len(), "partitioned event catalog");
    Ok((training, evaluation))
}

// Whole days (as a float) from `origin` to `date`; negative when `date`
// precedes `origin`.
fn day_offset(date: NaiveDate, origin: NaiveDate) -> f64 {
    date.signed_duration_since(origin).num_seconds() as f64 / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::catalog::EventCatalog;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Offset arithmetic against known day counts.
    // - Joint sorting of records and offsets.
    // - Inclusive bound selection and the between-windows gap.
    // - The earliest-training-record origin shared by both collections.
    // - Empty-training rejection and the negative-offset guard.
    //
    // These tests intentionally DO NOT cover:
    // - Date parsing or loading (see `events::loader`).
    // -------------------------------------------------------------------------

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(y: i32, m: u32, d: u32) -> EventRecord {
        EventRecord::new(date(y, m, d), 0.0, 0.0).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify offsets count whole days from the origin.
    //
    // Given
    // -----
    // - Records on the origin date and exactly one non-leap year later.
    //
    // Expect
    // ------
    // - Offsets 0.0 and 365.0.
    fn collection_offsets_count_days_from_origin() {
        let collection =
            EventCollection::new(vec![record(2019, 1, 1), record(2020, 1, 1)], date(2019, 1, 1))
                .unwrap();

        assert_eq!(collection.offsets().to_vec(), vec![0.0, 365.0]);
        assert_eq!(collection.origin(), date(2019, 1, 1));
    }

    #[test]
    // Purpose
    // -------
    // Ensure construction sorts records and offsets together.
    //
    // Given
    // -----
    // - Records deliberately out of chronological order.
    //
    // Expect
    // ------
    // - Ascending offsets with the record dates aligned to them.
    fn collection_sorts_records_with_offsets() {
        let shuffled = vec![record(2019, 3, 1), record(2019, 1, 5), record(2019, 2, 1)];

        let collection = EventCollection::new(shuffled, date(2019, 1, 1)).unwrap();

        assert_eq!(collection.offsets().to_vec(), vec![4.0, 31.0, 59.0]);
        assert_eq!(collection.records()[0].date, date(2019, 1, 5));
        assert_eq!(collection.records()[2].date, date(2019, 3, 1));
    }

    #[test]
    // Purpose
    // -------
    // Ensure records predating the origin are rejected.
    //
    // Given
    // -----
    // - A record one day before the origin.
    //
    // Expect
    // ------
    // - `PartitionError::NegativeOffset` echoing both dates.
    fn collection_rejects_records_before_origin() {
        let err = EventCollection::new(vec![record(2018, 12, 31)], date(2019, 1, 1)).unwrap_err();

        assert_eq!(
            err,
            PartitionError::NegativeOffset { date: date(2018, 12, 31), origin: date(2019, 1, 1) }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify inclusive bound selection on both windows, with the gap
    // between them belonging to neither.
    //
    // Given
    // -----
    // - Events on every boundary date, one inside the gap, and one before
    //   the training window.
    //
    // Expect
    // ------
    // - Boundary events land in their windows; the gap and pre-window
    //   events are dropped.
    fn partition_selects_inclusive_bounds() {
        let catalog = EventCatalog::from_records(vec![
            record(2018, 12, 1),  // before training
            record(2019, 1, 1),   // training start
            record(2019, 6, 30),  // training end
            record(2019, 7, 15),  // gap
            record(2019, 8, 1),   // test start
            record(2019, 12, 31), // test end
        ]);
        let window = TemporalWindow::new(
            date(2019, 1, 1),
            date(2019, 6, 30),
            date(2019, 8, 1),
            date(2019, 12, 31),
        )
        .unwrap();

        let (training, evaluation) = partition(&catalog, &window).unwrap();

        assert_eq!(training.len(), 2);
        assert_eq!(evaluation.len(), 2);
        assert_eq!(training.records()[0].date, date(2019, 1, 1));
        assert_eq!(evaluation.records()[1].date, date(2019, 12, 31));
    }

    #[test]
    // Purpose
    // -------
    // Confirm the origin is the earliest training record, not the window
    // start, and that both collections share it.
    //
    // Given
    // -----
    // - A training window opening 2019-01-01 whose earliest event is
    //   2019-01-11, and a test event 100 days after that.
    //
    // Expect
    // ------
    // - Both origins are 2019-01-11, the first training offset is exactly
    //   zero, and the test offset is 100.0.
    fn partition_anchors_origin_at_earliest_training_record() {
        let catalog =
            EventCatalog::from_records(vec![record(2019, 1, 11), record(2019, 4, 21)]);
        let window =
            TemporalWindow::new(date(2019, 1, 1), date(2019, 2, 1), date(2019, 4, 1), date(2019, 5, 1))
                .unwrap();

        let (training, evaluation) = partition(&catalog, &window).unwrap();

        assert_eq!(training.origin(), date(2019, 1, 11));
        assert_eq!(evaluation.origin(), date(2019, 1, 11));
        assert_eq!(training.offsets()[0], 0.0);
        assert_eq!(evaluation.offsets()[0], 100.0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure an empty training selection is rejected while an empty
    // evaluation selection is not.
    //
    // Given
    // -----
    // - A catalog whose only event falls in the evaluation window, then one
    //   whose only event falls in the training window.
    //
    // Expect
    // ------
    // - `EmptyTrainingSet` echoing the training bounds for the first;
    //   `Ok` with an empty evaluation collection for the second.
    fn partition_requires_training_events_only() {
        let window = TemporalWindow::new(
            date(2019, 1, 1),
            date(2019, 6, 30),
            date(2019, 7, 1),
            date(2019, 12, 31),
        )
        .unwrap();

        let test_only = EventCatalog::from_records(vec![record(2019, 8, 1)]);
        let err = partition(&test_only, &window).unwrap_err();
        assert_eq!(
            err,
            PartitionError::EmptyTrainingSet { start: date(2019, 1, 1), end: date(2019, 6, 30) }
        );

        let train_only = EventCatalog::from_records(vec![record(2019, 3, 1)]);
        let (training, evaluation) = partition(&train_only, &window).unwrap();
        assert_eq!(training.len(), 1);
        assert!(evaluation.is_empty());
    }
}
