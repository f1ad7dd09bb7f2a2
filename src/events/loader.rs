//! GeoJSON ingestion for event catalogs and road networks.
//!
//! Purpose
//! -------
//! Read the two source files the pipeline consumes: a FeatureCollection of
//! crime events (dates and coordinates carried as feature *properties*) and
//! a FeatureCollection of road geometry (lines and polygons carried as
//! feature *geometry*). Both loaders resolve the collection's declared CRS
//! and hand downstream code WGS84 degrees only.
//!
//! Key behaviors
//! -------------
//! - [`load_events`] gates on the required property schema first (in the
//!   order `Fecha`, `Long`, `Lat`): a key no feature carries is an error,
//!   while a key missing from individual records is a per-record skip. Date
//!   parsing is likewise lenient: a record whose date fails day-first
//!   parsing is skipped and counted, and only a non-empty collection where
//!   *every* date fails is an error.
//! - Records whose coordinate properties are missing values, non-numeric, or
//!   non-finite are likewise skipped and counted.
//! - [`load_roads`] flattens `LineString`/`MultiLineString`/`Polygon`/
//!   `MultiPolygon` (and nested `GeometryCollection`s) into a
//!   [`RoadNetwork`], skipping point features; a file yielding no usable
//!   geometry is an error.
//! - A legacy `crs` foreign member selects the source projection; absent, the
//!   GeoJSON default (WGS84) applies. Unsupported names are an error.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every record in a returned catalog has a parsed date and finite WGS84
//!   coordinates.
//! - Event feature geometry is ignored: the `Long`/`Lat` properties are the
//!   canonical location, matching the upstream data convention.
//! - Road coordinates are not finiteness-checked here; the spatial domain
//!   rejects degenerate geometry at construction.
//!
//! Conventions
//! -----------
//! - Dates parse with [`DAY_FIRST_FORMAT`] (`dd/mm/yyyy`).
//! - Skip accounting gives dates precedence: a record failing both checks
//!   counts once, as a date skip.
//!
//! Downstream usage
//! ----------------
//! - The pipeline loads both files once per run; the catalog feeds the
//!   partitioner and the network feeds [`SpatialDomain`] construction.
//!
//! Testing notes
//! -------------
//! - Unit tests exercise schema gate ordering, the all-dates-fail error,
//!   lenient skipping with accounting, Web Mercator reprojection, CRS
//!   rejection, top-level shape rejection, and road geometry flattening.
//!
//! [`SpatialDomain`]: crate::spatial::SpatialDomain
use crate::{
    events::{
        catalog::{EventCatalog, EventRecord, DAY_FIRST_FORMAT},
        crs::Crs,
        errors::{LoadError, LoadResult},
    },
    spatial::network::RoadNetwork,
};
use chrono::NaiveDate;
use geo::{Coord, LineString, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson, Value};
use std::{fs, path::Path};
use tracing::{info, warn};

/// Property key carrying the event date.
pub const FIELD_DATE: &str = "Fecha";
/// Property key carrying the event longitude (or projected x).
pub const FIELD_LON: &str = "Long";
/// Property key carrying the event latitude (or projected y).
pub const FIELD_LAT: &str = "Lat";

// Schema gate order; the first missing key is the one reported.
const REQUIRED_FIELDS: [&str; 3] = [FIELD_DATE, FIELD_LON, FIELD_LAT];

/// Load an event catalog from a GeoJSON FeatureCollection.
///
/// Purpose
/// -------
/// Parse the event file into validated [`EventRecord`]s, reprojecting to
/// WGS84 when the collection declares Web Mercator, and skipping (with
/// accounting) records whose date or coordinates are unusable.
///
/// Parameters
/// ----------
/// - `path`: `&Path`
///   Location of the event GeoJSON file.
///
/// Returns
/// -------
/// `LoadResult<EventCatalog>`
///   - `Ok(catalog)` with the usable records and skip counters.
///   - `Err(LoadError::Io | Format)` for unreadable or non-GeoJSON input,
///     or a top-level value that is not a FeatureCollection.
///   - `Err(LoadError::Schema)` naming the first required property key
///     (`Fecha`, then `Long`, then `Lat`) that no feature carries.
///   - `Err(LoadError::Crs)` for an unsupported declared CRS.
///   - `Err(LoadError::DateParse)` when the collection is non-empty and not
///     a single date parsed.
///
/// Panics
/// ------
/// - Never panics.
pub fn load_events(path: &Path) -> LoadResult<EventCatalog> {
    let collection = read_feature_collection(path)?;
    let crs = collection_crs(&collection)?;

    // A key counts as present when any feature carries it; per-record
    // absences are handled leniently below.
    if !collection.features.is_empty() {
        for field in REQUIRED_FIELDS {
            if collection.features.iter().all(|feature| property(feature, field).is_none()) {
                return Err(LoadError::Schema { field });
            }
        }
    }

    let mut records = Vec::with_capacity(collection.features.len());
    let mut dates_parsed = 0usize;
    let mut skipped_dates = 0usize;
    let mut skipped_coordinates = 0usize;
    for feature in &collection.features {
        let Some(date) = property(feature, FIELD_DATE)
            .and_then(|value| value.as_str())
            .and_then(|text| NaiveDate::parse_from_str(text, DAY_FIRST_FORMAT).ok())
        else {
            skipped_dates += 1;
            continue;
        };
        dates_parsed += 1;

        let lon = property(feature, FIELD_LON).and_then(|value| value.as_f64());
        let lat = property(feature, FIELD_LAT).and_then(|value| value.as_f64());
        let (Some(x), Some(y)) = (lon, lat) else {
            skipped_coordinates += 1;
            continue;
        };
        let (lon, lat) = crs.to_wgs84(x, y);
        match EventRecord::new(date, lon, lat) {
            Ok(record) => records.push(record),
            Err(_) => skipped_coordinates += 1,
        }
    }

    if !collection.features.is_empty() && dates_parsed == 0 {
        return Err(LoadError::DateParse { attempted: collection.features.len() });
    }
    if skipped_dates > 0 || skipped_coordinates > 0 {
        warn!(
            path = %path.display(),
            skipped_dates,
            skipped_coordinates,
            "dropped unusable event records"
        );
    }
    info!(path = %path.display(), events = records.len(), "loaded event catalog");
    Ok(EventCatalog::new(records, skipped_dates, skipped_coordinates))
}

/// Load road geometry from a GeoJSON FeatureCollection.
///
/// Purpose
/// -------
/// Flatten the collection's line and polygon features into a
/// [`RoadNetwork`] in WGS84 degrees, reprojecting when necessary.
///
/// Parameters
/// ----------
/// - `path`: `&Path`
///   Location of the road GeoJSON file.
///
/// Returns
/// -------
/// `LoadResult<RoadNetwork>`
///   - `Ok(network)` with at least one line or polygon feature.
///   - `Err(LoadError::Io | Format | Crs)` as for [`load_events`].
///   - `Err(LoadError::Geometry)` for malformed positions, polygons without
///     an exterior ring, or a collection with no usable geometry at all.
///
/// Panics
/// ------
/// - Never panics.
pub fn load_roads(path: &Path) -> LoadResult<RoadNetwork> {
    let collection = read_feature_collection(path)?;
    let crs = collection_crs(&collection)?;

    let mut lines = Vec::new();
    let mut polygons = Vec::new();
    let mut skipped_features = 0usize;
    for feature in &collection.features {
        match &feature.geometry {
            Some(geometry) => {
                if !extract_value(&geometry.value, crs, &mut lines, &mut polygons)? {
                    skipped_features += 1;
                }
            }
            None => skipped_features += 1,
        }
    }

    if lines.is_empty() && polygons.is_empty() {
        return Err(LoadError::Geometry { reason: "no line or polygon features" });
    }
    if skipped_features > 0 {
        warn!(path = %path.display(), skipped_features, "ignored non-line road features");
    }
    info!(
        path = %path.display(),
        lines = lines.len(),
        polygons = polygons.len(),
        "loaded road network"
    );
    Ok(RoadNetwork::new(lines, polygons))
}

// ---- Shared GeoJSON plumbing ----

// Read and parse the file, insisting on a top-level FeatureCollection.
fn read_feature_collection(path: &Path) -> LoadResult<FeatureCollection> {
    let raw = fs::read_to_string(path)
        .map_err(|err| LoadError::Io { path: path.display().to_string(), reason: err.to_string() })?;
    let parsed: GeoJson = raw.parse().map_err(|err: geojson::Error| LoadError::Format {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    match parsed {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(LoadError::Format {
            path: path.display().to_string(),
            reason: "top-level value is not a FeatureCollection".to_string(),
        }),
    }
}

// Resolve the legacy `crs` foreign member; absent means WGS84 per the
// GeoJSON default.
fn collection_crs(collection: &FeatureCollection) -> LoadResult<Crs> {
    let Some(members) = &collection.foreign_members else {
        return Ok(Crs::Wgs84);
    };
    let Some(declared) = members.get("crs") else {
        return Ok(Crs::Wgs84);
    };
    let name = declared
        .get("properties")
        .and_then(|properties| properties.get("name"))
        .and_then(|name| name.as_str())
        .ok_or_else(|| LoadError::Crs { name: declared.to_string() })?;
    Crs::parse(name).ok_or_else(|| LoadError::Crs { name: name.to_string() })
}

fn property<'a>(feature: &'a Feature, field: &str) -> Option<&'a serde_json::Value> {
    feature.properties.as_ref().and_then(|properties| properties.get(field))
}

// Flatten one geometry value into the line/polygon accumulators. Returns
// whether anything usable was extracted.
fn extract_value(
    value: &Value, crs: Crs, lines: &mut Vec<LineString<f64>>, polygons: &mut Vec<Polygon<f64>>,
) -> LoadResult<bool> {
    match value {
        Value::LineString(coords) => {
            lines.push(line_string(coords, crs)?);
            Ok(true)
        }
        Value::MultiLineString(parts) => {
            for coords in parts {
                lines.push(line_string(coords, crs)?);
            }
            Ok(!parts.is_empty())
        }
        Value::Polygon(rings) => {
            polygons.push(polygon(rings, crs)?);
            Ok(true)
        }
        Value::MultiPolygon(parts) => {
            for rings in parts {
                polygons.push(polygon(rings, crs)?);
            }
            Ok(!parts.is_empty())
        }
        Value::GeometryCollection(members) => {
            let mut extracted = false;
            for member in members {
                extracted |= extract_value(&member.value, crs, lines, polygons)?;
            }
            Ok(extracted)
        }
        Value::Point(_) | Value::MultiPoint(_) => Ok(false),
    }
}

fn line_string(coords: &[Vec<f64>], crs: Crs) -> LoadResult<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len());
    for pos in coords {
        points.push(position(pos, crs)?);
    }
    Ok(LineString::new(points))
}

fn polygon(rings: &[Vec<Vec<f64>>], crs: Crs) -> LoadResult<Polygon<f64>> {
    let Some((exterior, interiors)) = rings.split_first() else {
        return Err(LoadError::Geometry { reason: "polygon without an exterior ring" });
    };
    let exterior = line_string(exterior, crs)?;
    let interiors = interiors
        .iter()
        .map(|ring| line_string(ring, crs))
        .collect::<LoadResult<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn position(pos: &[f64], crs: Crs) -> LoadResult<Coord<f64>> {
    if pos.len() < 2 {
        return Err(LoadError::Geometry { reason: "position with fewer than two coordinates" });
    }
    let (x, y) = crs.to_wgs84(pos[0], pos[1]);
    Ok(Coord { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::crs::mercator_forward;
    use std::path::PathBuf;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Event loading: schema gate order, lenient skipping with accounting,
    //   the all-dates-fail error, and Web Mercator reprojection.
    // - Road loading: geometry flattening and the no-usable-geometry error.
    // - Shared plumbing: IO errors, top-level shape, and CRS rejection.
    //
    // These tests intentionally DO NOT cover:
    // - Partitioning semantics (see `events::partition`).
    // -------------------------------------------------------------------------

    // Purpose
    // -------
    // Write `contents` into a fresh temp directory and return both (the
    // directory guard keeps the file alive for the test's duration).
    fn write_geojson(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.geojson");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    fn event_feature(fecha: &str, lon: &str, lat: &str) -> String {
        format!(
            r#"{{"type": "Feature", "geometry": null,
                 "properties": {{"Fecha": {fecha}, "Long": {lon}, "Lat": {lat}}}}}"#
        )
    }

    fn collection(features: &[String], crs: Option<&str>) -> String {
        let features = features.join(",");
        match crs {
            Some(name) => format!(
                r#"{{"type": "FeatureCollection",
                     "crs": {{"type": "name", "properties": {{"name": "{name}"}}}},
                     "features": [{features}]}}"#
            ),
            None => format!(r#"{{"type": "FeatureCollection", "features": [{features}]}}"#),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the happy path: valid features load in order with zero skip
    // accounting.
    //
    // Given
    // -----
    // - Two features with day-first dates and numeric coordinates, no CRS
    //   member.
    //
    // Expect
    // ------
    // - Both records load with their original coordinates and parsed dates.
    fn load_events_reads_valid_features() {
        let features =
            [event_feature("\"14/03/2020\"", "-74.08", "4.61"), event_feature("\"15/03/2020\"", "-74.10", "4.65")];
        let (_dir, path) = write_geojson(&collection(&features, None));

        let catalog = load_events(&path).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.skipped_dates(), 0);
        assert_eq!(catalog.skipped_coordinates(), 0);
        let first = &catalog.records()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2020, 3, 14).unwrap());
        assert_eq!((first.lon, first.lat), (-74.08, 4.61));
    }

    #[test]
    // Purpose
    // -------
    // Ensure the schema gate reports the *first* missing field in the
    // documented order, before any date parsing.
    //
    // Given
    // -----
    // - One file missing both `Fecha` and `Long`; another missing only
    //   `Long` while carrying an unparseable date.
    //
    // Expect
    // ------
    // - `Schema { field: "Fecha" }` resp. `Schema { field: "Long" }`; the
    //   bad date never surfaces.
    fn load_events_reports_first_missing_field() {
        let both = r#"{"type": "Feature", "geometry": null, "properties": {"Lat": 4.61}}"#;
        let (_dir, path) = write_geojson(&collection(&[both.to_string()], None));
        assert_eq!(load_events(&path).unwrap_err(), LoadError::Schema { field: "Fecha" });

        let lon_only = r#"{"type": "Feature", "geometry": null,
                           "properties": {"Fecha": "not a date", "Lat": 4.61}}"#;
        let (_dir, path) = write_geojson(&collection(&[lon_only.to_string()], None));
        assert_eq!(load_events(&path).unwrap_err(), LoadError::Schema { field: "Long" });
    }

    #[test]
    // Purpose
    // -------
    // Verify the all-dates-fail gate.
    //
    // Given
    // -----
    // - Two features whose `Fecha` values cannot parse day-first (free text
    //   and an ISO-ordered date with an impossible month).
    //
    // Expect
    // ------
    // - `DateParse { attempted: 2 }`.
    fn load_events_rejects_collection_with_no_parseable_dates() {
        let features = [
            event_feature("\"not a date\"", "-74.08", "4.61"),
            event_feature("\"2020-13-45\"", "-74.10", "4.65"),
        ];
        let (_dir, path) = write_geojson(&collection(&features, None));

        let err = load_events(&path).unwrap_err();

        assert_eq!(err, LoadError::DateParse { attempted: 2 });
    }

    #[test]
    // Purpose
    // -------
    // Verify lenient skipping with per-cause accounting, dates taking
    // precedence.
    //
    // Given
    // -----
    // - One valid feature, one with an unparseable date, one with a
    //   non-numeric `Long` value (key present), and one lacking the `Long`
    //   key entirely (other features carry it, so the schema gate passes).
    //
    // Expect
    // ------
    // - One record loads; `skipped_dates == 1`, `skipped_coordinates == 2`.
    fn load_events_skips_and_counts_bad_records() {
        let no_lon = r#"{"type": "Feature", "geometry": null,
                         "properties": {"Fecha": "17/03/2020", "Lat": 4.67}}"#;
        let features = [
            event_feature("\"14/03/2020\"", "-74.08", "4.61"),
            event_feature("\"garbage\"", "-74.10", "4.65"),
            event_feature("\"16/03/2020\"", "\"oops\"", "4.66"),
            no_lon.to_string(),
        ];
        let (_dir, path) = write_geojson(&collection(&features, None));

        let catalog = load_events(&path).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.skipped_dates(), 1);
        assert_eq!(catalog.skipped_coordinates(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Verify Web Mercator input is reprojected to WGS84 degrees.
    //
    // Given
    // -----
    // - A collection declaring `EPSG:3857`, with one record whose `Long` /
    //   `Lat` properties carry the forward projection of (-74.08, 4.61).
    //
    // Expect
    // ------
    // - The loaded record holds the original degrees within 1e-9.
    fn load_events_reprojects_web_mercator() {
        let (x, y) = mercator_forward(-74.08, 4.61);
        let features = [event_feature("\"14/03/2020\"", &x.to_string(), &y.to_string())];
        let (_dir, path) = write_geojson(&collection(&features, Some("EPSG:3857")));

        let catalog = load_events(&path).unwrap();

        assert_eq!(catalog.len(), 1);
        let record = &catalog.records()[0];
        assert!((record.lon - -74.08).abs() < 1e-9);
        assert!((record.lat - 4.61).abs() < 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Ensure unsupported and malformed CRS members are rejected by name.
    //
    // Given
    // -----
    // - A collection declaring `EPSG:32718` (UTM, unsupported).
    //
    // Expect
    // ------
    // - `LoadError::Crs` carrying the declared name.
    fn load_events_rejects_unsupported_crs() {
        let features = [event_feature("\"14/03/2020\"", "-74.08", "4.61")];
        let (_dir, path) = write_geojson(&collection(&features, Some("EPSG:32718")));

        let err = load_events(&path).unwrap_err();

        assert_eq!(err, LoadError::Crs { name: "EPSG:32718".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // Reject files that are unreadable or not FeatureCollections at the top
    // level.
    //
    // Given
    // -----
    // - A path that does not exist, and a file holding a bare Feature.
    //
    // Expect
    // ------
    // - `LoadError::Io` resp. `LoadError::Format` naming the path.
    fn load_events_rejects_missing_and_misshapen_files() {
        let missing = Path::new("/nonexistent/events.geojson");
        assert!(matches!(load_events(missing), Err(LoadError::Io { .. })));

        let (_dir, path) = write_geojson(&event_feature("\"14/03/2020\"", "-74.08", "4.61"));
        let err = load_events(&path).unwrap_err();
        match err {
            LoadError::Format { reason, .. } => assert!(reason.contains("FeatureCollection")),
            other => panic!("expected Format, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify road loading flattens lines, multilines, and polygons.
    //
    // Given
    // -----
    // - A collection with one LineString, one MultiLineString of two parts,
    //   one Polygon, and one Point.
    //
    // Expect
    // ------
    // - Three lines and one polygon; the point is ignored.
    fn load_roads_flattens_line_and_polygon_features() {
        let raw = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {},
             "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 0.0]]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "MultiLineString",
                          "coordinates": [[[0.0, 1.0], [1.0, 1.0]], [[0.0, 2.0], [1.0, 2.0]]]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Polygon",
                          "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Point", "coordinates": [0.5, 0.5]}}
        ]}"#;
        let (_dir, path) = write_geojson(raw);

        let network = load_roads(&path).unwrap();

        assert_eq!(network.lines().len(), 3);
        assert_eq!(network.polygons().len(), 1);
        assert_eq!(network.feature_count(), 4);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a collection with only point features is rejected.
    //
    // Given
    // -----
    // - One Point feature and one feature with null geometry.
    //
    // Expect
    // ------
    // - `LoadError::Geometry` with the no-usable-geometry reason.
    fn load_roads_rejects_pointless_collections() {
        let raw = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Point", "coordinates": [0.5, 0.5]}},
            {"type": "Feature", "properties": {}, "geometry": null}
        ]}"#;
        let (_dir, path) = write_geojson(raw);

        let err = load_roads(&path).unwrap_err();

        assert_eq!(err, LoadError::Geometry { reason: "no line or polygon features" });
    }
}
