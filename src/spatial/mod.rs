//! Road-network geometry and the buffered spatial domain.
//!
//! Purpose
//! -------
//! Everything spatial lives here: the validated [`RoadNetwork`] container
//! produced by the GeoJSON loader, the buffered [`SpatialDomain`] the point
//! process is defined on, and the error taxonomy for domain construction.
//!
//! Downstream usage
//! ----------------
//! - `events::loader` builds a [`RoadNetwork`] from road GeoJSON.
//! - The pipeline buffers it into a [`SpatialDomain`] once per run; the
//!   model layer consumes the domain's area, membership test, and grid.
pub mod domain;
pub mod errors;
pub mod network;

pub use domain::{DomainGrid, SpatialDomain, DEFAULT_MARGIN_DEGREES};
pub use errors::{DomainError, DomainResult};
pub use network::RoadNetwork;
