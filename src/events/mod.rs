//! Event ingestion: loading, validation, and window partitioning.
//!
//! Purpose
//! -------
//! Everything between a GeoJSON file on disk and a model-ready event
//! collection lives here: lenient loading with skip accounting
//! ([`loader`]), validated containers ([`catalog`]), CRS resolution
//! ([`crs`]), and the training/evaluation split on the day-offset axis
//! ([`partition`]).
//!
//! Downstream usage
//! ----------------
//! - The pipeline calls [`load_events`]/[`load_roads`] once per run, then
//!   [`partition`](partition::partition) with a validated window.
pub mod catalog;
pub mod crs;
pub mod errors;
pub mod loader;
pub mod partition;

pub use catalog::{EventCatalog, EventRecord, DAY_FIRST_FORMAT};
pub use crs::Crs;
pub use errors::{LoadError, LoadResult, PartitionError, PartitionResult};
pub use loader::{load_events, load_roads, FIELD_DATE, FIELD_LAT, FIELD_LON};
pub use partition::{partition, EventCollection, SECONDS_PER_DAY};
