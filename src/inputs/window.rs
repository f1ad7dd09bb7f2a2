//! Training/evaluation window validation.
//!
//! Purpose
//! -------
//! Represent the four dates that split an event catalog into a training set
//! and a held-out evaluation set, with the chronological-order invariant
//! enforced at construction. A [`TemporalWindow`] that exists is a window
//! that is usable.
//!
//! Key behaviors
//! -------------
//! - [`TemporalWindow::new`] validates
//!   `training_start < training_end < test_start < test_end`; any equality
//!   or inversion between adjacent dates is rejected.
//! - [`TemporalWindow::parse`] accepts day-first text for all four dates and
//!   names the offending field on failure.
//! - [`suggest_window`] derives a default window from a catalog's date span:
//!   one year of training from the earliest event, evaluation on the
//!   remainder, or `None` when the span is too short to order strictly.
//!
//! Invariants & assumptions
//! ------------------------
//! - The four dates are civil dates; window bounds are inclusive on both
//!   ends when the partitioner selects events.
//!
//! Downstream usage
//! ----------------
//! - The partitioner selects training and evaluation records by these
//!   bounds; the earliest selected training record becomes the time origin.
//! - The CLI pre-populates its prompts from [`suggest_window`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover each adjacent ordering violation, rejection of equal
//!   boundaries, parse failures naming their field, and suggestion fallback
//!   for catalogs shorter than a year.
use crate::{
    events::catalog::{EventCatalog, DAY_FIRST_FORMAT},
    inputs::errors::{InputError, InputResult},
};
use chrono::{Days, NaiveDate};

/// Prompt wording for the training window's first day.
pub const TRAINING_START_FIELD: &str = "training start date";
/// Prompt wording for the training window's last day.
pub const TRAINING_END_FIELD: &str = "training end date";
/// Prompt wording for the evaluation window's first day.
pub const TEST_START_FIELD: &str = "test start date";
/// Prompt wording for the evaluation window's last day.
pub const TEST_END_FIELD: &str = "test end date";

// Default training span used when suggesting a window from a catalog.
const SUGGESTED_TRAINING_DAYS: u64 = 365;

/// `TemporalWindow` — validated training and evaluation date bounds.
///
/// Purpose
/// -------
/// Carry the four window dates with their ordering invariant already
/// checked, so downstream code can partition without re-validating.
///
/// Fields (internal)
/// -----------------
/// - `training_start`, `training_end`: inclusive training bounds.
/// - `test_start`, `test_end`: inclusive evaluation bounds.
///
/// Invariants
/// ----------
/// - `training_start < training_end < test_start < test_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalWindow {
    training_start: NaiveDate,
    training_end: NaiveDate,
    test_start: NaiveDate,
    test_end: NaiveDate,
}

impl TemporalWindow {
    /// Construct a validated window from four civil dates.
    ///
    /// Parameters
    /// ----------
    /// - `training_start`, `training_end`: `NaiveDate`
    ///   Inclusive training bounds.
    /// - `test_start`, `test_end`: `NaiveDate`
    ///   Inclusive evaluation bounds.
    ///
    /// Returns
    /// -------
    /// `InputResult<TemporalWindow>`
    ///   - `Ok(window)` when the dates are strictly increasing.
    ///   - `Err(InputError::DateOrder)` echoing all four dates otherwise,
    ///     including when any two adjacent dates coincide.
    ///
    /// Panics
    /// ------
    /// - Never panics.
    pub fn new(
        training_start: NaiveDate, training_end: NaiveDate, test_start: NaiveDate,
        test_end: NaiveDate,
    ) -> InputResult<TemporalWindow> {
        if training_start >= training_end || training_end >= test_start || test_start >= test_end {
            return Err(InputError::DateOrder {
                training_start,
                training_end,
                test_start,
                test_end,
            });
        }
        Ok(TemporalWindow { training_start, training_end, test_start, test_end })
    }

    /// Parse four day-first date strings and validate their ordering.
    ///
    /// Each failed parse is reported as [`InputError::DateFormat`] naming
    /// the field with the same wording the prompts use; ordering violations
    /// surface as in [`TemporalWindow::new`].
    pub fn parse(
        training_start: &str, training_end: &str, test_start: &str, test_end: &str,
    ) -> InputResult<TemporalWindow> {
        let training_start = parse_date(TRAINING_START_FIELD, training_start)?;
        let training_end = parse_date(TRAINING_END_FIELD, training_end)?;
        let test_start = parse_date(TEST_START_FIELD, test_start)?;
        let test_end = parse_date(TEST_END_FIELD, test_end)?;
        TemporalWindow::new(training_start, training_end, test_start, test_end)
    }

    /// First day of the training window (inclusive).
    pub fn training_start(&self) -> NaiveDate {
        self.training_start
    }

    /// Last day of the training window (inclusive).
    pub fn training_end(&self) -> NaiveDate {
        self.training_end
    }

    /// First day of the evaluation window (inclusive).
    pub fn test_start(&self) -> NaiveDate {
        self.test_start
    }

    /// Last day of the evaluation window (inclusive).
    pub fn test_end(&self) -> NaiveDate {
        self.test_end
    }
}

/// Suggest a window from a catalog's date span.
///
/// Training runs from the earliest event date for a year; evaluation starts
/// the following day and ends at the latest event. Returns `None` when the
/// catalog is empty or spans too few days for the strict ordering to hold;
/// callers fall back to prompting for explicit dates.
pub fn suggest_window(catalog: &EventCatalog) -> Option<TemporalWindow> {
    let (earliest, latest) = catalog.date_span()?;
    let training_end = earliest.checked_add_days(Days::new(SUGGESTED_TRAINING_DAYS))?;
    let test_start = training_end.checked_add_days(Days::new(1))?;
    TemporalWindow::new(earliest, training_end, test_start, latest).ok()
}

fn parse_date(field: &'static str, text: &str) -> InputResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DAY_FIRST_FORMAT)
        .map_err(|_| InputError::DateFormat { field, text: text.to_string() })
}
