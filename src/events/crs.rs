//! Coordinate reference system support.
//!
//! Provides the small set of CRS identities the loader understands and the
//! closed-form spherical-Mercator transforms between them. Keeping the math
//! here (rather than binding a system projection library) means the crate
//! builds without native dependencies; the supported set is exactly WGS84
//! and Web Mercator.
//!
//! # Provided items
//! - [`Crs`]: the supported reference systems, with [`Crs::parse`] accepting
//!   the common EPSG/OGC spellings.
//! - [`mercator_forward`] / [`mercator_inverse`]: spherical Web Mercator
//!   (EPSG:3857) transforms on the WGS84 ellipsoid radius.
//!
//! # Conventions
//! - Longitude/latitude are in degrees; projected coordinates in meters.
//! - Round-tripping `mercator_inverse(mercator_forward(lon, lat))` agrees
//!   with the input to well below 1e-9 degrees for latitudes inside the
//!   Mercator validity band.

/// Equatorial radius used by spherical Web Mercator, in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// A coordinate reference system the loader can reproject from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// Geographic longitude/latitude in degrees (EPSG:4326 / CRS84).
    Wgs84,
    /// Spherical Web Mercator in meters (EPSG:3857).
    WebMercator,
}

impl Crs {
    /// Parse a CRS name as it appears in legacy GeoJSON `crs` members.
    ///
    /// Accepts the common spellings case-insensitively:
    /// - WGS84: `EPSG:4326`, `CRS84`, `OGC:CRS84`,
    ///   `urn:ogc:def:crs:OGC:1.3:CRS84`, `urn:ogc:def:crs:EPSG::4326`
    /// - Web Mercator: `EPSG:3857`, `EPSG:900913`,
    ///   `urn:ogc:def:crs:EPSG::3857`
    ///
    /// Returns `None` for anything else; the caller decides how to surface
    /// the unsupported name.
    pub fn parse(name: &str) -> Option<Crs> {
        match name.trim().to_uppercase().as_str() {
            "EPSG:4326" | "CRS84" | "OGC:CRS84" | "URN:OGC:DEF:CRS:OGC:1.3:CRS84"
            | "URN:OGC:DEF:CRS:EPSG::4326" => Some(Crs::Wgs84),
            "EPSG:3857" | "EPSG:900913" | "URN:OGC:DEF:CRS:EPSG::3857" => Some(Crs::WebMercator),
            _ => None,
        }
    }

    /// Map a coordinate pair from this CRS into WGS84 degrees.
    ///
    /// For [`Crs::Wgs84`] this is the identity; for [`Crs::WebMercator`] the
    /// input is interpreted as projected meters.
    pub fn to_wgs84(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Crs::Wgs84 => (x, y),
            Crs::WebMercator => mercator_inverse(x, y),
        }
    }
}

/// Project WGS84 degrees onto spherical Web Mercator meters.
pub fn mercator_forward(lon: f64, lat: f64) -> (f64, f64) {
    let x = EARTH_RADIUS_M * lon.to_radians();
    let y = EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// Invert spherical Web Mercator meters back to WGS84 degrees.
pub fn mercator_inverse(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lon, lat)
}
