//! Road-network geometry container.
//!
//! Holds the line and polygon features the loader extracted from a boundary
//! file, already reprojected to WGS84. The container itself is deliberately
//! dumb: emptiness and degeneracy are judged where they matter, at domain
//! construction time.
use geo::{LineString, Polygon};

/// Road geometry in WGS84 degrees.
///
/// - `lines`: open street/way features.
/// - `polygons`: closed features (plazas, blocks) whose interior counts as
///   part of the network.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadNetwork {
    lines: Vec<LineString<f64>>,
    polygons: Vec<Polygon<f64>>,
}

impl RoadNetwork {
    /// Wrap already-reprojected geometry.
    pub fn new(lines: Vec<LineString<f64>>, polygons: Vec<Polygon<f64>>) -> RoadNetwork {
        RoadNetwork { lines, polygons }
    }

    /// Line features.
    pub fn lines(&self) -> &[LineString<f64>] {
        &self.lines
    }

    /// Polygon features.
    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.polygons
    }

    /// Total number of features of either kind.
    pub fn feature_count(&self) -> usize {
        self.lines.len() + self.polygons.len()
    }

    /// Whether the network has no features at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.polygons.is_empty()
    }
}
