//! Errors for event loading and window partitioning (schema checks, date
//! parsing, CRS handling, and offset invariants).
//!
//! This module defines a loading error type, [`LoadError`], and a partitioning
//! error type, [`PartitionError`], used by the geotemporal loader and the
//! dataset partitioner. Both implement `Display`/`Error`.
//!
//! ## Conventions
//! - Dates are civil dates parsed day-first (`dd/mm/yyyy`).
//! - Schema violations are reported **before** any date parsing is attempted,
//!   and name exactly the missing field.
//! - Date parsing is lenient per record; only a collection where *every*
//!   record fails to parse is a [`LoadError::DateParse`].
use chrono::NaiveDate;

/// Result alias for loader operations that may produce [`LoadError`].
pub type LoadResult<T> = Result<T, LoadError>;

/// Result alias for partitioning operations that may produce
/// [`PartitionError`].
pub type PartitionResult<T> = Result<T, PartitionError>;

/// Unified error type for loading events and road geometry.
///
/// Covers file access, GeoJSON structure, schema gates, date parsing, CRS
/// resolution, and coordinate validity. Implements `Display`/`Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    // ---- File / format ----
    /// The file could not be read.
    Io { path: String, reason: String },

    /// The file is not valid GeoJSON.
    Format { path: String, reason: String },

    // ---- Schema / content ----
    /// A required property key is absent from the collection.
    Schema { field: &'static str },

    /// Every record's date failed day-first parsing.
    DateParse { attempted: usize },

    /// The geometry payload is unusable (wrong top-level type, malformed
    /// positions, or no line/polygon features).
    Geometry { reason: &'static str },

    // ---- Coordinate reference systems ----
    /// The declared coordinate reference system is not supported.
    Crs { name: String },

    // ---- Record validation ----
    /// A coordinate is NaN/±inf.
    NonFiniteCoordinate { axis: &'static str, value: f64 },
}

impl std::error::Error for LoadError {}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- File / format ----
            LoadError::Io { path, reason } => {
                write!(f, "Could not read {path}: {reason}")
            }
            LoadError::Format { path, reason } => {
                write!(f, "{path} is not valid GeoJSON: {reason}")
            }
            // ---- Schema / content ----
            LoadError::Schema { field } => {
                write!(f, "Required field '{field}' is missing from the event data.")
            }
            LoadError::DateParse { attempted } => {
                write!(
                    f,
                    "No event date could be parsed as day-first dd/mm/yyyy ({attempted} records examined)."
                )
            }
            LoadError::Geometry { reason } => {
                write!(f, "Unusable geometry: {reason}")
            }
            // ---- Coordinate reference systems ----
            LoadError::Crs { name } => {
                write!(f, "Unsupported coordinate reference system: {name}")
            }
            // ---- Record validation ----
            LoadError::NonFiniteCoordinate { axis, value } => {
                write!(f, "Coordinate '{axis}' must be finite; got: {value}")
            }
        }
    }
}

/// Errors specific to splitting a catalog into training and evaluation sets.
///
/// Typical causes are an empty training selection and (defensively) offsets
/// that violate the non-negativity invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionError {
    /// The training window selected no events.
    EmptyTrainingSet { start: NaiveDate, end: NaiveDate },

    /// An offset fell before the training origin.
    NegativeOffset { date: NaiveDate, origin: NaiveDate },

    /// An offset is NaN/±inf.
    NonFiniteOffset { index: usize, value: f64 },
}

impl std::error::Error for PartitionError {}

impl std::fmt::Display for PartitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionError::EmptyTrainingSet { start, end } => {
                write!(f, "No events fall inside the training window {start} to {end}.")
            }
            PartitionError::NegativeOffset { date, origin } => {
                write!(f, "Event date {date} precedes the training origin {origin}.")
            }
            PartitionError::NonFiniteOffset { index, value } => {
                write!(f, "Offset at index {index} is non-finite: {value}")
            }
        }
    }
}
