//! SVG rendering for the diagnostic set.
//!
//! Purpose
//! -------
//! Turn a [`DiagnosticSet`] into four standalone SVG files so a run leaves
//! inspectable artifacts on disk instead of requiring an interactive
//! display: the spatial intensity heatmap, the excitation-share histogram,
//! the temporal intensity curve, and the optimizer parameter traces.
//!
//! Key behaviors
//! -------------
//! - [`render_all`] creates the output directory if needed, writes the four
//!   files under fixed names, and returns their paths in a fixed order.
//! - Every `plotters` failure is folded into [`ModelError::Render`] with
//!   the backend's message preserved.
//!
//! Conventions
//! -----------
//! - The heatmap colors only admissible cells, on a white-to-red ramp
//!   scaled by the maximum expected count; inadmissible cells stay blank.
//! - The histogram uses ten equal bins over `[0, 1]`.
//! - Traces render on the natural scale, one panel per parameter.
//!
//! Downstream usage
//! ----------------
//! - [`InferenceEngine::render_diagnostics`] calls [`render_all`] in its
//!   default implementation; the pipeline reports the returned paths.
//!
//! [`InferenceEngine::render_diagnostics`]: crate::model::capability::InferenceEngine::render_diagnostics
use std::{
    fs,
    path::{Path, PathBuf},
};

use plotters::prelude::*;

use crate::model::{
    diagnostics::{
        DiagnosticSet, ExcitationProportion, ParameterTraces, SpatialIntensitySurface,
        TemporalIntensityCurve,
    },
    errors::{ModelError, ModelResult},
};
use ndarray::Array1;

/// File name of the spatial intensity heatmap.
pub const SPATIAL_FILE: &str = "spatial_intensity.svg";
/// File name of the excitation-share histogram.
pub const EXCITATION_FILE: &str = "excitation_proportion.svg";
/// File name of the temporal intensity curve.
pub const TEMPORAL_FILE: &str = "temporal_intensity.svg";
/// File name of the parameter-trace panels.
pub const TRACES_FILE: &str = "parameter_traces.svg";

const CHART_SIZE: (u32, u32) = (800, 600);
const HISTOGRAM_BINS: usize = 10;

fn render_err<E: std::fmt::Display>(err: E) -> ModelError {
    ModelError::Render { reason: err.to_string() }
}

/// Render all four diagnostics as SVG files under `dir`.
///
/// Parameters
/// ----------
/// - `set`: `&DiagnosticSet`
///   The materialized diagnostics of a committed fit.
/// - `dir`: `&Path`
///   Output directory; created (including parents) when absent.
///
/// Returns
/// -------
/// `ModelResult<Vec<PathBuf>>`
///   The four file paths, in the order spatial, excitation, temporal,
///   traces.
///
/// Errors
/// ------
/// - `ModelError::Render` for directory-creation or backend failures.
pub fn render_all(set: &DiagnosticSet, dir: &Path) -> ModelResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(render_err)?;

    let spatial = dir.join(SPATIAL_FILE);
    render_spatial(&set.spatial, &spatial)?;
    let excitation = dir.join(EXCITATION_FILE);
    render_excitation(&set.excitation, &excitation)?;
    let temporal = dir.join(TEMPORAL_FILE);
    render_temporal(&set.temporal, &temporal)?;
    let traces = dir.join(TRACES_FILE);
    render_traces(&set.traces, &traces)?;

    Ok(vec![spatial, excitation, temporal, traces])
}

// Heatmap of expected counts over the admissible cells.
fn render_spatial(surface: &SpatialIntensitySurface, path: &Path) -> ModelResult<()> {
    let grid = &surface.grid;
    let half_w = grid.cell_width() / 2.0;
    let half_h = grid.cell_height() / 2.0;
    let (x_lo, x_hi) = axis_range(grid.xs(), half_w)?;
    let (y_lo, y_hi) = axis_range(grid.ys(), half_h)?;

    let peak = surface.expected_counts.iter().cloned().fold(0.0, f64::max);
    let scale = if peak > 0.0 { peak } else { 1.0 };

    let mask = grid.mask();
    let (rows, cols) = mask.dim();
    let mut cells = Vec::with_capacity(grid.active_cells());
    for r in 0..rows {
        for c in 0..cols {
            if !mask[[r, c]] {
                continue;
            }
            let frac = surface.expected_counts[[r, c]] / scale;
            let shade = (240.0 * (1.0 - frac)) as u8;
            let x = grid.xs()[c];
            let y = grid.ys()[r];
            cells.push(Rectangle::new(
                [(x - half_w, y - half_h), (x + half_w, y + half_h)],
                RGBColor(255, shade, shade).filled(),
            ));
        }
    }

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Spatial intensity on the road network", ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("longitude (deg)")
        .y_desc("latitude (deg)")
        .draw()
        .map_err(render_err)?;
    chart.draw_series(cells).map_err(render_err)?;
    root.present().map_err(render_err)?;
    Ok(())
}

// Histogram of per-event excitation shares over [0, 1].
fn render_excitation(excitation: &ExcitationProportion, path: &Path) -> ModelResult<()> {
    let mut counts = [0usize; HISTOGRAM_BINS];
    for &share in excitation.responsibilities.iter() {
        let bin = ((share * HISTOGRAM_BINS as f64) as usize).min(HISTOGRAM_BINS - 1);
        counts[bin] += 1;
    }
    let y_max = counts.iter().copied().max().unwrap_or(0).max(1) as f64;

    let bars = counts.iter().enumerate().map(|(i, &count)| {
        let lo = i as f64 / HISTOGRAM_BINS as f64;
        let hi = (i + 1) as f64 / HISTOGRAM_BINS as f64;
        Rectangle::new([(lo, 0.0), (hi, count as f64)], BLUE.mix(0.5).filled())
    });

    let caption = format!(
        "Events explained by self-excitation (overall {:.1}%)",
        100.0 * excitation.overall
    );
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..1.0, 0.0..y_max * 1.1)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("excitation share")
        .y_desc("events")
        .draw()
        .map_err(render_err)?;
    chart.draw_series(bars).map_err(render_err)?;
    root.present().map_err(render_err)?;
    Ok(())
}

// Space-integrated intensity over the training horizon.
fn render_temporal(curve: &TemporalIntensityCurve, path: &Path) -> ModelResult<()> {
    let (x_lo, x_hi) = axis_range(&curve.times, 0.0)?;
    let peak = curve.intensities.iter().cloned().fold(0.0, f64::max);
    let y_hi = if peak > 0.0 { peak * 1.05 } else { 1.0 };

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Temporal intensity", ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_hi)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("days since origin")
        .y_desc("events per day")
        .draw()
        .map_err(render_err)?;
    chart
        .draw_series(LineSeries::new(
            curve
                .times
                .iter()
                .zip(curve.intensities.iter())
                .map(|(&t, &v)| (t, v)),
            &RED,
        ))
        .map_err(render_err)?;
    root.present().map_err(render_err)?;
    Ok(())
}

// Four panels of natural-scale optimizer iterates.
fn render_traces(traces: &ParameterTraces, path: &Path) -> ModelResult<()> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let areas = root.split_evenly((2, 2));

    let panels: [(&str, &Array1<f64>); 4] = [
        ("background log-rate", &traces.background_log_rate),
        ("branching ratio", &traces.branching_ratio),
        ("temporal decay", &traces.decay_per_day),
        ("spatial bandwidth", &traces.bandwidth_sq_deg),
    ];
    for (area, (title, series)) in areas.iter().zip(panels.iter()) {
        if series.is_empty() {
            continue;
        }
        let lo = series.fold(f64::INFINITY, |acc, &v| acc.min(v));
        let hi = series.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        let pad = if hi - lo > 0.0 { 0.05 * (hi - lo) } else { 0.5 };
        let last = (series.len() - 1).max(1) as f64;

        let mut chart = ChartBuilder::on(area)
            .caption(*title, ("sans-serif", 16))
            .margin(8)
            .x_label_area_size(28)
            .y_label_area_size(48)
            .build_cartesian_2d(0.0..last, (lo - pad)..(hi + pad))
            .map_err(render_err)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("iteration")
            .draw()
            .map_err(render_err)?;
        chart
            .draw_series(LineSeries::new(
                series.iter().enumerate().map(|(i, &v)| (i as f64, v)),
                &BLUE,
            ))
            .map_err(render_err)?;
    }
    root.present().map_err(render_err)?;
    Ok(())
}

// Plot bounds from cell centers plus a half-cell on each side.
fn axis_range(centers: &Array1<f64>, half_cell: f64) -> ModelResult<(f64, f64)> {
    let (first, last) = match (centers.first(), centers.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(ModelError::Render {
                reason: "There are no samples to lay out an axis over.".to_string(),
            })
        }
    };
    let lo = first - half_cell;
    let hi = last + half_cell;
    if hi > lo {
        Ok((lo, hi))
    } else {
        // Degenerate single-sample axis; widen symmetrically.
        Ok((lo - 0.5, hi + 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{domain::SpatialDomain, network::RoadNetwork};
    use geo::LineString;
    use ndarray::{array, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `render_all` writing all four files into a fresh directory.
    // - SVG content actually landing on disk (non-empty, SVG markup).
    // - The degenerate constant-trace panel not aborting the render.
    //
    // These tests intentionally DO NOT cover:
    // - Pixel-exact output; only artifact presence and well-formedness.
    // -------------------------------------------------------------------------

    fn sample_set() -> DiagnosticSet {
        let network = RoadNetwork::new(
            vec![LineString::from(vec![(0.0, 0.0), (1.0, 1.0)])],
            vec![],
        );
        let domain = SpatialDomain::build(&network, 0.05).unwrap();
        let grid = domain.grid(4).unwrap();
        let mut expected_counts = Array2::zeros((4, 4));
        expected_counts[[1, 1]] = 2.5;
        expected_counts[[2, 2]] = 1.0;

        DiagnosticSet {
            spatial: SpatialIntensitySurface { grid, expected_counts },
            excitation: ExcitationProportion {
                responsibilities: array![0.0, 0.35, 0.92],
                overall: 0.423,
            },
            temporal: TemporalIntensityCurve {
                times: Array1::linspace(0.0, 2.0, 16),
                intensities: Array1::linspace(1.5, 2.5, 16),
            },
            traces: ParameterTraces {
                background_log_rate: array![1.0, 1.1, 1.2],
                branching_ratio: array![0.25, 0.26, 0.27],
                decay_per_day: array![1.0, 0.9, 0.8],
                // Constant series exercises the degenerate-range padding.
                bandwidth_sq_deg: array![0.1, 0.1, 0.1],
            },
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify `render_all` creates the directory, writes the four fixed
    // file names, and each file holds SVG markup.
    //
    // Given
    // -----
    // - A hand-built diagnostic set and a nested, not-yet-existing output
    //   directory.
    //
    // Expect
    // ------
    // - Four paths in fixed order; every file exists and contains `<svg`.
    fn render_all_writes_four_svg_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run").join("diagnostics");

        let files = render_all(&sample_set(), &out).unwrap();

        assert_eq!(
            files,
            vec![
                out.join(SPATIAL_FILE),
                out.join(EXCITATION_FILE),
                out.join(TEMPORAL_FILE),
                out.join(TRACES_FILE),
            ]
        );
        for file in &files {
            let content = std::fs::read_to_string(file).unwrap();
            assert!(content.contains("<svg"), "{} lacks SVG markup", file.display());
        }
    }
}
