//! Event containers for the spatio-temporal pipeline.
//!
//! Purpose
//! -------
//! Provide small, validated containers for geolocated, timestamped events as
//! they come out of the loader. This module centralizes record validation so
//! downstream code (partitioning, model assembly) can assume clean dates and
//! finite coordinates.
//!
//! Key behaviors
//! -------------
//! - [`EventRecord`] enforces finite longitude/latitude at construction time.
//! - [`EventCatalog`] carries every successfully loaded record together with
//!   load accounting (how many source records were skipped, and why).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every record's coordinates are finite; its date parsed day-first.
//! - A catalog may be empty: emptiness is a *partitioning* concern, not a
//!   loading concern, and is reported there.
//! - Coordinates are WGS84 longitude/latitude degrees; the loader resolves
//!   any source projection before records are constructed.
//!
//! Conventions
//! -----------
//! - Dates are civil dates (no time-of-day); the day-first pattern is
//!   [`DAY_FIRST_FORMAT`].
//! - Catalog accounting counts *skipped* source records; it never stores
//!   them.
//!
//! Downstream usage
//! ----------------
//! - The loader constructs records via [`EventRecord::new`] and wraps them in
//!   an [`EventCatalog`].
//! - The partitioner consumes [`EventCatalog::records`] and may rely on the
//!   record invariants without re-validating.
//! - Window pre-population uses [`EventCatalog::date_span`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover record validation (finite coordinate enforcement) and
//!   catalog accessors (`date_span` over empty and populated catalogs).
use crate::events::errors::{LoadError, LoadResult};
use chrono::NaiveDate;

/// Day-first civil date pattern used across the pipeline (`dd/mm/yyyy`).
pub const DAY_FIRST_FORMAT: &str = "%d/%m/%Y";

/// `EventRecord` — one geolocated, dated event.
///
/// Purpose
/// -------
/// Represent a single crime event with a parsed civil date and a WGS84
/// location. Construction validates the coordinates so downstream code can
/// assume finite values.
///
/// Fields
/// ------
/// - `date`: `NaiveDate`
///   Civil date of the event (parsed day-first by the loader).
/// - `lon`: `f64`
///   Longitude in degrees; must be finite.
/// - `lat`: `f64`
///   Latitude in degrees; must be finite.
///
/// Invariants
/// ----------
/// - `lon` and `lat` are finite.
///
/// Notes
/// -----
/// - Range checks (e.g. |lat| ≤ 90) are intentionally not enforced here; the
///   spatial domain membership test is the authority on usable locations.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Civil date of the event.
    pub date: NaiveDate,
    /// Longitude in WGS84 degrees (finite).
    pub lon: f64,
    /// Latitude in WGS84 degrees (finite).
    pub lat: f64,
}

impl EventRecord {
    /// Construct a validated [`EventRecord`].
    ///
    /// Parameters
    /// ----------
    /// - `date`: `NaiveDate`
    ///   Civil date of the event.
    /// - `lon`, `lat`: `f64`
    ///   WGS84 coordinates; each must be finite.
    ///
    /// Returns
    /// -------
    /// `LoadResult<EventRecord>`
    ///   - `Ok(EventRecord)` when both coordinates are finite.
    ///   - `Err(LoadError::NonFiniteCoordinate)` naming the offending axis
    ///     otherwise.
    ///
    /// Panics
    /// ------
    /// - Never panics.
    pub fn new(date: NaiveDate, lon: f64, lat: f64) -> LoadResult<EventRecord> {
        if !lon.is_finite() {
            return Err(LoadError::NonFiniteCoordinate { axis: "Long", value: lon });
        }
        if !lat.is_finite() {
            return Err(LoadError::NonFiniteCoordinate { axis: "Lat", value: lat });
        }
        Ok(EventRecord { date, lon, lat })
    }
}

/// `EventCatalog` — every successfully loaded event, plus load accounting.
///
/// Purpose
/// -------
/// Hold the usable slice of a source file together with counters describing
/// what was dropped on the way in. The catalog is the loader's output and
/// the partitioner's input.
///
/// Key behaviors
/// -------------
/// - Stores records in source order; no sorting happens here.
/// - Tracks how many source records were skipped because their date failed
///   day-first parsing, and how many because their coordinates were missing
///   or non-finite.
///
/// Invariants
/// ----------
/// - Every stored record satisfies the [`EventRecord`] invariants.
/// - May be empty (see module notes).
#[derive(Debug, Clone, PartialEq)]
pub struct EventCatalog {
    records: Vec<EventRecord>,
    skipped_dates: usize,
    skipped_coordinates: usize,
}

impl EventCatalog {
    /// Construct a catalog from validated records and skip counters.
    pub fn new(
        records: Vec<EventRecord>, skipped_dates: usize, skipped_coordinates: usize,
    ) -> EventCatalog {
        EventCatalog { records, skipped_dates, skipped_coordinates }
    }

    /// Construct a catalog with zero skip accounting (synthetic data, tests).
    pub fn from_records(records: Vec<EventRecord>) -> EventCatalog {
        EventCatalog::new(records, 0, 0)
    }

    /// The loaded records, in source order.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Number of loaded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Source records dropped because their date failed to parse.
    pub fn skipped_dates(&self) -> usize {
        self.skipped_dates
    }

    /// Source records dropped because of missing or non-finite coordinates.
    pub fn skipped_coordinates(&self) -> usize {
        self.skipped_coordinates
    }

    /// Earliest and latest event dates, or `None` for an empty catalog.
    ///
    /// Used by window pre-population; a single-record catalog returns the
    /// same date twice.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        let (min, max) = self
            .records
            .iter()
            .fold((first, first), |(lo, hi), r| (lo.min(r.date), hi.max(r.date)));
        Some((min, max))
    }
}
