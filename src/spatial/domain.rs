//! Buffered road-network domain.
//!
//! Purpose
//! -------
//! Turn raw road geometry into the admissible region the point process lives
//! on: the union of every feature buffered by a margin. The domain answers
//! the three questions the model layer asks of space: is this point
//! admissible, how large is the region, and what does a regular sample of it
//! look like.
//!
//! Key behaviors
//! -------------
//! - [`SpatialDomain::build`] validates the margin, rejects empty or
//!   degenerate geometry, and precomputes the buffered bounding box and a
//!   total-area estimate.
//! - [`SpatialDomain::contains`] is exact: a point is admissible iff its
//!   Euclidean distance to some feature is at most the margin (polygon
//!   interiors count as distance zero).
//! - [`SpatialDomain::grid`] samples the bounding box on a regular lattice
//!   and masks cells whose center is admissible.
//!
//! Invariants & assumptions
//! ------------------------
//! - `margin` is strictly positive and finite.
//! - `area` is strictly positive and finite (checked at construction).
//! - The area is a capsule-sum approximation: each line contributes
//!   `2·margin·length + π·margin²`, each polygon its interior plus an
//!   outward boundary band. Overlapping features double-count; membership
//!   tests are unaffected.
//!
//! Conventions
//! -----------
//! - Geometry is planar WGS84 degrees; the margin is in degrees as well.
//!   At city scale the planar approximation is well inside the error budget
//!   of the margin itself.
//!
//! Downstream usage
//! ----------------
//! - The model layer normalizes its background intensity by [`area`] and
//!   renders intensity surfaces over [`grid`].
//! - The orchestrator builds one domain per run from the loaded network and
//!   the configured margin.
//!
//! Testing notes
//! -------------
//! - Unit tests cover margin validation, empty/degenerate rejection, the
//!   capsule area formula, membership near and far from features, polygon
//!   interiors, and grid masking.
//!
//! [`area`]: SpatialDomain::area
//! [`grid`]: SpatialDomain::grid
use crate::spatial::{
    errors::{DomainError, DomainResult},
    network::RoadNetwork,
};
use geo::{Area, Coord, EuclideanDistance, EuclideanLength, Line, Point, Polygon, Rect};
use ndarray::{Array1, Array2};

/// Default buffer margin around road features, in degrees (roughly 16 m at
/// the equator).
pub const DEFAULT_MARGIN_DEGREES: f64 = 0.00015;

/// `SpatialDomain` — the admissible region for events.
///
/// Purpose
/// -------
/// Represent the union of all road features buffered by `margin`, with the
/// derived quantities the model needs precomputed. Construction validates
/// everything; afterwards the domain is an immutable value.
///
/// Fields (internal)
/// -----------------
/// - flattened line segments and polygon features retained for membership
///   tests;
/// - `margin`: the buffer half-width;
/// - `bbox`: feature bounding box expanded by `margin` on every side;
/// - `area`: capsule-sum area estimate (strictly positive, finite).
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialDomain {
    segments: Vec<Line<f64>>,
    polygons: Vec<Polygon<f64>>,
    margin: f64,
    bbox: Rect<f64>,
    area: f64,
}

impl SpatialDomain {
    /// Build the admissible region from road geometry and a buffer margin.
    ///
    /// Parameters
    /// ----------
    /// - `network`: [`RoadNetwork`]
    ///   Reprojected road geometry; must contain at least one feature.
    /// - `margin`: `f64`
    ///   Buffer half-width in degrees; must be finite and strictly positive.
    ///
    /// Returns
    /// -------
    /// `DomainResult<SpatialDomain>`
    ///   - `Ok(domain)` when the buffered region is usable.
    ///   - `Err(DomainError::NonPositiveMargin)` for a bad margin.
    ///   - `Err(DomainError::EmptyNetwork)` when no features exist.
    ///   - `Err(DomainError::DegenerateArea)` when the capsule-sum area is
    ///     zero or non-finite (for example, NaN coordinates).
    ///
    /// Panics
    /// ------
    /// - Never panics.
    pub fn build(network: &RoadNetwork, margin: f64) -> DomainResult<SpatialDomain> {
        if !margin.is_finite() || margin <= 0.0 {
            return Err(DomainError::NonPositiveMargin { value: margin });
        }
        if network.is_empty() {
            return Err(DomainError::EmptyNetwork);
        }

        let cap = std::f64::consts::PI * margin * margin;
        let mut segments = Vec::new();
        let mut area = 0.0;
        for line in network.lines() {
            area += 2.0 * margin * line.euclidean_length() + cap;
            segments.extend(line.lines());
        }
        let polygons = network.polygons().to_vec();
        for poly in &polygons {
            area += poly.unsigned_area() + margin * poly.exterior().euclidean_length() + cap;
        }
        if !area.is_finite() || area <= 0.0 {
            return Err(DomainError::DegenerateArea { value: area });
        }

        let bbox = bounding_rect(&segments, &polygons, margin).ok_or(DomainError::EmptyNetwork)?;
        Ok(SpatialDomain { segments, polygons, margin, bbox, area })
    }

    /// Whether `point` lies inside the buffered region.
    ///
    /// Exact test: distance to the nearest feature at most `margin`, with
    /// polygon interiors at distance zero. A cheap bounding-box rejection
    /// runs first.
    pub fn contains(&self, point: &Point<f64>) -> bool {
        let c = Coord { x: point.x(), y: point.y() };
        if c.x < self.bbox.min().x
            || c.x > self.bbox.max().x
            || c.y < self.bbox.min().y
            || c.y > self.bbox.max().y
        {
            return false;
        }
        if self.polygons.iter().any(|poly| point.euclidean_distance(poly) <= self.margin) {
            return true;
        }
        self.segments.iter().any(|seg| point.euclidean_distance(seg) <= self.margin)
    }

    /// Capsule-sum area estimate of the buffered region, in squared degrees.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Buffer margin, in degrees.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Feature bounding box expanded by the margin on every side.
    pub fn bounding_box(&self) -> Rect<f64> {
        self.bbox
    }

    /// Sample the bounding box on a `resolution × resolution` lattice.
    ///
    /// Each cell is marked admissible iff its *center* passes
    /// [`SpatialDomain::contains`]. Thin networks produce sparse masks at
    /// coarse resolutions; callers choose the resolution that suits their
    /// artifact.
    ///
    /// # Errors
    /// - [`DomainError::InvalidGridResolution`] when `resolution == 0`.
    pub fn grid(&self, resolution: usize) -> DomainResult<DomainGrid> {
        if resolution == 0 {
            return Err(DomainError::InvalidGridResolution { value: resolution });
        }
        let cell_width = self.bbox.width() / resolution as f64;
        let cell_height = self.bbox.height() / resolution as f64;
        let min = self.bbox.min();
        let xs = Array1::from_shape_fn(resolution, |c| min.x + (c as f64 + 0.5) * cell_width);
        let ys = Array1::from_shape_fn(resolution, |r| min.y + (r as f64 + 0.5) * cell_height);
        let mask = Array2::from_shape_fn((resolution, resolution), |(r, c)| {
            self.contains(&Point::new(xs[c], ys[r]))
        });
        Ok(DomainGrid { xs, ys, mask, cell_width, cell_height })
    }
}

/// Regular lattice over a domain's bounding box with an admissibility mask.
///
/// Rows index `ys` (latitude), columns index `xs` (longitude); `mask[[r, c]]`
/// says whether the cell centered at `(xs[c], ys[r])` is admissible.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainGrid {
    xs: Array1<f64>,
    ys: Array1<f64>,
    mask: Array2<bool>,
    cell_width: f64,
    cell_height: f64,
}

impl DomainGrid {
    /// Cell-center longitudes, one per column.
    pub fn xs(&self) -> &Array1<f64> {
        &self.xs
    }

    /// Cell-center latitudes, one per row.
    pub fn ys(&self) -> &Array1<f64> {
        &self.ys
    }

    /// Admissibility mask, rows × columns.
    pub fn mask(&self) -> &Array2<bool> {
        &self.mask
    }

    /// Cell width in degrees.
    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    /// Cell height in degrees.
    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    /// Number of admissible cells.
    pub fn active_cells(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }
}

// Bounding box over all feature coordinates, expanded by `margin`.
// Returns `None` when no coordinates exist.
fn bounding_rect(
    segments: &[Line<f64>], polygons: &[Polygon<f64>], margin: f64,
) -> Option<Rect<f64>> {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut fold = |c: Coord<f64>| {
        min_x = min_x.min(c.x);
        min_y = min_y.min(c.y);
        max_x = max_x.max(c.x);
        max_y = max_y.max(c.y);
    };
    for seg in segments {
        fold(seg.start);
        fold(seg.end);
    }
    for poly in polygons {
        for c in poly.exterior().coords() {
            fold(*c);
        }
    }
    if min_x > max_x || min_y > max_y {
        return None;
    }
    Some(Rect::new(
        Coord { x: min_x - margin, y: min_y - margin },
        Coord { x: max_x + margin, y: max_y + margin },
    ))
}
