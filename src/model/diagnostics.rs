//! Diagnostic artifacts computed from a fitted model.
//!
//! Purpose
//! -------
//! Turn a fitted parameter set and its training data into the four
//! artifacts the pipeline reports: a spatial expected-count surface, the
//! per-event excitation proportions, the space-integrated temporal
//! intensity curve, and the optimizer's parameter traces in natural scale.
//! Everything here is data; drawing lives in `model::render`.
//!
//! Key behaviors
//! -------------
//! - The spatial surface integrates the intensity over the training
//!   horizon per grid cell, evaluated at cell centers and masked to the
//!   domain (inadmissible cells hold zero).
//! - The temporal curve samples the space-integrated rate
//!   `exp(a₀) + Σ_{t_j < t} α β e^{−β (t − t_j)}` on an even time grid.
//! - Trace conversion maps optimizer iterates to natural scale without
//!   re-validation: every recorded iterate already survived an objective
//!   evaluation during the run.
//!
//! Downstream usage
//! ----------------
//! - `model::hawkes` assembles a [`DiagnosticSet`] from its fitted state;
//!   `model::render` draws one SVG per artifact.
use crate::{
    model::{
        dataset::ModelDataset,
        errors::{ModelError, ModelResult},
        intensity,
        params::{HawkesParams, NUM_PARAMS},
    },
    optim::{stability::safe_logistic, trace::ParameterTrace},
    spatial::domain::{DomainGrid, SpatialDomain},
};
use ndarray::{Array1, Array2};
use std::f64::consts::PI;

// Sample count for the temporal intensity curve.
const TEMPORAL_SAMPLES: usize = 256;

/// Expected event count per admissible grid cell over the training horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialIntensitySurface {
    /// The lattice the surface is sampled on.
    pub grid: DomainGrid,
    /// Expected counts, rows × columns like the grid mask; zero outside it.
    pub expected_counts: Array2<f64>,
}

/// Per-event triggered-intensity share and its average.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcitationProportion {
    /// `triggered / λ` per training event, in `[0, 1)`, event order.
    pub responsibilities: Array1<f64>,
    /// Mean responsibility; the model's overall self-excitation share.
    pub overall: f64,
}

/// Space-integrated intensity sampled over the training horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalIntensityCurve {
    /// Sample times in days, evenly spaced over `[0, horizon]`.
    pub times: Array1<f64>,
    /// Total rate `exp(a₀) + Σ α β e^{−β Δt}` at each sample time.
    pub intensities: Array1<f64>,
}

/// Optimizer iterates in natural scale, one series per parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTraces {
    /// `a₀` per iterate.
    pub background_log_rate: Array1<f64>,
    /// `α` per iterate.
    pub branching_ratio: Array1<f64>,
    /// `β` per iterate.
    pub decay_per_day: Array1<f64>,
    /// `σ²` per iterate.
    pub bandwidth_sq_deg: Array1<f64>,
}

/// The four artifacts produced after a successful fit.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticSet {
    pub spatial: SpatialIntensitySurface,
    pub excitation: ExcitationProportion,
    pub temporal: TemporalIntensityCurve,
    pub traces: ParameterTraces,
}

/// Integrate the intensity over the training horizon on the domain grid.
///
/// Each admissible cell holds
/// `cell_area · (μ₀ · T + Σ_i α (1 − e^{−β (T − t_i)}) N₂(s_c − s_i; σ²))`,
/// the expected number of events in that cell under the fitted process.
///
/// # Errors
/// - Propagates [`DomainError::InvalidGridResolution`] for a zero
///   resolution.
///
/// [`DomainError::InvalidGridResolution`]: crate::spatial::errors::DomainError
pub fn spatial_intensity_surface(
    params: &HawkesParams, train: &ModelDataset, domain: &SpatialDomain, resolution: usize,
    horizon: f64,
) -> ModelResult<SpatialIntensitySurface> {
    let grid = domain.grid(resolution)?;
    let cell_area = grid.cell_width() * grid.cell_height();
    let background = intensity::background_density(params, domain.area());

    let mut expected_counts = Array2::zeros(grid.mask().raw_dim());
    for ((row, col), &admissible) in grid.mask().indexed_iter() {
        if !admissible {
            continue;
        }
        let density =
            expected_count_density(params, train, horizon, grid.xs()[col], grid.ys()[row]);
        expected_counts[[row, col]] = cell_area * (background * horizon + density);
    }
    Ok(SpatialIntensitySurface { grid, expected_counts })
}

/// Excitation responsibilities of the training events, with their mean.
///
/// # Errors
/// - [`ModelError::EmptyTrainingData`] when there are no events to
///   attribute.
pub fn excitation_proportion(
    params: &HawkesParams, train: &ModelDataset, area: f64,
) -> ModelResult<ExcitationProportion> {
    if train.is_empty() {
        return Err(ModelError::EmptyTrainingData);
    }
    let responsibilities = intensity::excitation_responsibilities(params, train, train, area);
    let overall = responsibilities.sum() / responsibilities.len() as f64;
    Ok(ExcitationProportion { responsibilities, overall })
}

/// Sample the space-integrated intensity over `[0, horizon]`.
pub fn temporal_intensity_curve(
    params: &HawkesParams, train: &ModelDataset, horizon: f64,
) -> TemporalIntensityCurve {
    let alpha = params.branching_ratio;
    let beta = params.decay_per_day;
    let background = params.background_log_rate.exp();

    let step = horizon / (TEMPORAL_SAMPLES - 1) as f64;
    let times = Array1::from_shape_fn(TEMPORAL_SAMPLES, |i| i as f64 * step);
    let intensities = times.mapv(|t| {
        let mut total = background;
        for &t_j in train.times() {
            if t_j >= t {
                break;
            }
            total += alpha * beta * (-beta * (t - t_j)).exp();
        }
        total
    });
    TemporalIntensityCurve { times, intensities }
}

/// Convert optimizer iterates to natural-scale parameter series.
///
/// # Errors
/// - [`ModelError::InvalidParameter`] when the trace dimension is not the
///   model's four parameters.
pub fn parameter_traces(trace: &ParameterTrace) -> ModelResult<ParameterTraces> {
    if !trace.is_empty() && trace.dim() != NUM_PARAMS {
        return Err(ModelError::InvalidParameter {
            name: "trace dimension",
            value: trace.dim() as f64,
            reason: "must match the model's four parameters",
        });
    }
    let steps = trace.steps();
    Ok(ParameterTraces {
        background_log_rate: steps.iter().map(|theta| theta[0]).collect(),
        branching_ratio: steps.iter().map(|theta| safe_logistic(theta[1])).collect(),
        decay_per_day: steps.iter().map(|theta| theta[2].exp()).collect(),
        bandwidth_sq_deg: steps.iter().map(|theta| theta[3].exp()).collect(),
    })
}

// Triggered part of the time-integrated intensity density at (x, y):
// sum of alpha * (1 - e^{-beta (T - t_i)}) * N2 over training events.
fn expected_count_density(
    params: &HawkesParams, train: &ModelDataset, horizon: f64, x: f64, y: f64,
) -> f64 {
    let alpha = params.branching_ratio;
    let beta = params.decay_per_day;
    let sigma_sq = params.bandwidth_sq_deg;
    let kernel_norm = 2.0 * PI * sigma_sq;

    let mut total = 0.0;
    for ((&t_i, &x_i), &y_i) in
        train.times().iter().zip(train.xs().iter()).zip(train.ys().iter())
    {
        if t_i >= horizon {
            break;
        }
        let dx = x - x_i;
        let dy = y - y_i;
        let kernel = (-(dx * dx + dy * dy) / (2.0 * sigma_sq)).exp() / kernel_norm;
        total += alpha * (1.0 - (-beta * (horizon - t_i)).exp()) * kernel;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::network::RoadNetwork;
    use geo::LineString;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Surface shape, masking, and the hand-computed density helper.
    // - Responsibility bounds and the empty-training rejection.
    // - Temporal curve endpoints against closed forms.
    // - Trace conversion to natural scale and its dimension check.
    //
    // These tests intentionally DO NOT cover:
    // - SVG rendering (see `model::render`).
    // -------------------------------------------------------------------------

    fn params() -> HawkesParams {
        HawkesParams::new(0.5, 0.4, 2.0, 0.02).unwrap()
    }

    fn dataset(times: Vec<f64>, xs: Vec<f64>, ys: Vec<f64>) -> ModelDataset {
        ModelDataset::new(Array1::from_vec(times), Array1::from_vec(xs), Array1::from_vec(ys))
            .unwrap()
    }

    // A thin diagonal: its margin-expanded bounding box has corners well
    // outside the buffered band, so the grid mask gets both kinds of cell.
    fn domain() -> SpatialDomain {
        let network = RoadNetwork::new(
            vec![LineString::from(vec![(0.0, 0.0), (1.0, 1.0)])],
            vec![],
        );
        SpatialDomain::build(&network, 0.05).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify the surface is shaped like the grid, zero off the mask, and
    // positive on it.
    //
    // Given
    // -----
    // - A thin diagonal domain, one event, resolution 8.
    //
    // Expect
    // ------
    // - 8×8 counts; both cell kinds present; every unmasked cell zero;
    //   every masked cell positive.
    fn surface_respects_the_mask() {
        let train = dataset(vec![0.0], vec![0.5], vec![0.5]);

        let surface =
            spatial_intensity_surface(&params(), &train, &domain(), 8, 10.0).unwrap();

        assert_eq!(surface.expected_counts.dim(), (8, 8));
        let admissible_cells = surface.grid.active_cells();
        assert!(admissible_cells > 0);
        assert!(admissible_cells < 64);
        for ((row, col), &admissible) in surface.grid.mask().indexed_iter() {
            let count = surface.expected_counts[[row, col]];
            if admissible {
                assert!(count > 0.0, "masked cell ({row}, {col}) should be positive");
            } else {
                assert_eq!(count, 0.0, "unmasked cell ({row}, {col}) should be zero");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Check the triggered density helper against its closed form at
    // distance zero.
    //
    // Given
    // -----
    // - One event at the origin at t = 0, horizon 3.
    //
    // Expect
    // ------
    // - `α (1 − e^{−3β}) / (2π σ²)` within 1e-12.
    fn expected_count_density_matches_closed_form() {
        let train = dataset(vec![0.0], vec![0.0], vec![0.0]);

        let density = expected_count_density(&params(), &train, 3.0, 0.0, 0.0);

        let expected = 0.4 * (1.0 - (-6.0_f64).exp()) / (2.0 * PI * 0.02);
        assert!((density - expected).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify responsibilities: zero for the first event, strictly inside
    // (0, 1) for a closely-following one, mean reported as `overall`.
    //
    // Given
    // -----
    // - Two colocated events one day apart, area 1.
    //
    // Expect
    // ------
    // - First responsibility 0, second in (0, 1), overall their mean; an
    //   empty dataset is rejected.
    fn responsibilities_attribute_afterglow() {
        let train = dataset(vec![0.0, 1.0], vec![0.0, 0.0], vec![0.0, 0.0]);

        let excitation = excitation_proportion(&params(), &train, 1.0).unwrap();

        assert_eq!(excitation.responsibilities[0], 0.0);
        assert!(excitation.responsibilities[1] > 0.0);
        assert!(excitation.responsibilities[1] < 1.0);
        let mean = (excitation.responsibilities[0] + excitation.responsibilities[1]) / 2.0;
        assert!((excitation.overall - mean).abs() < 1e-15);

        let empty = dataset(vec![], vec![], vec![]);
        let err = excitation_proportion(&params(), &empty, 1.0).unwrap_err();
        assert_eq!(err, ModelError::EmptyTrainingData);
    }

    #[test]
    // Purpose
    // -------
    // Check the temporal curve's endpoints against closed forms.
    //
    // Given
    // -----
    // - One event at t = 0, horizon 2.
    //
    // Expect
    // ------
    // - 256 samples; background `e^{a₀}` at t = 0 and
    //   `e^{a₀} + α β e^{−2β}` at t = 2, within 1e-12.
    fn temporal_curve_endpoints_are_exact() {
        let train = dataset(vec![0.0], vec![0.0], vec![0.0]);

        let curve = temporal_intensity_curve(&params(), &train, 2.0);

        assert_eq!(curve.times.len(), 256);
        assert_eq!(curve.times[0], 0.0);
        assert!((curve.times[255] - 2.0).abs() < 1e-12);
        assert!((curve.intensities[0] - 0.5_f64.exp()).abs() < 1e-12);
        let expected_end = 0.5_f64.exp() + 0.4 * 2.0 * (-4.0_f64).exp();
        assert!((curve.intensities[255] - expected_end).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify trace conversion applies the inverse transforms per iterate
    // and rejects a wrong-width trace.
    //
    // Given
    // -----
    // - A two-step trace in θ-space, and a three-wide trace.
    //
    // Expect
    // ------
    // - Natural-scale series matching `logistic`/`exp` by hand; the
    //   three-wide trace is `InvalidParameter`.
    fn traces_convert_to_natural_scale() {
        let trace =
            ParameterTrace::new(vec![array![0.0, 0.0, 0.0, -1.0], array![1.0, 1.0, 0.5, 0.0]]);

        let series = parameter_traces(&trace).unwrap();

        assert_eq!(series.background_log_rate.to_vec(), vec![0.0, 1.0]);
        assert!((series.branching_ratio[0] - 0.5).abs() < 1e-12);
        assert!((series.decay_per_day[1] - 0.5_f64.exp()).abs() < 1e-12);
        assert!((series.bandwidth_sq_deg[0] - (-1.0_f64).exp()).abs() < 1e-12);

        let bad = ParameterTrace::new(vec![array![0.0, 0.0, 0.0]]);
        assert!(parameter_traces(&bad).is_err());
    }
}
