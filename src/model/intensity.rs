//! Conditional-intensity arithmetic for the self-exciting process.
//!
//! Implements the pointwise intensity, the per-event log-intensities, and
//! the integrated (compensator) term that together make up the point-process
//! log-likelihood.
//!
//! ## Model convention
//! `λ(t, s) = μ₀ + Σ_{t_j < t} α · β e^{−β (t − t_j)} · N₂(s − s_j; σ²)`
//! with constant background density `μ₀ = exp(a₀) / |A|` over the domain
//! area `|A|` and an isotropic Gaussian spatial kernel
//! `N₂(d; σ²) = exp(−‖d‖² / 2σ²) / (2π σ²)`.
//!
//! ## Compensator
//! The integral of `λ` over the domain and a window `[from, to]` uses the
//! exact exponential tail: the background contributes `exp(a₀)·(to − from)`
//! and each history event `t_j < to` contributes
//! `α · (e^{−β (from − t_j)⁺} − e^{−β (to − t_j)})`. The spatial kernel's
//! mass over the domain is treated as unity; near the network's edge some
//! kernel mass falls outside, an accepted approximation.
//!
//! ## Ordering assumptions
//! - Exciters are strictly earlier events: a history entry with `t_j = t`
//!   contributes nothing at `t`, so same-day events do not excite each
//!   other.
//!
//! ## Invariants (enforced upstream)
//! - Parameters come from [`HawkesParams`] (supports respected); datasets
//!   come from [`ModelDataset`] (finite, ascending); `area > 0` comes from
//!   the spatial domain.
use crate::model::{dataset::ModelDataset, params::HawkesParams};
use ndarray::Array1;
use std::f64::consts::PI;

/// Background intensity density `μ₀ = exp(a₀) / |A|`.
pub fn background_density(params: &HawkesParams, area: f64) -> f64 {
    params.background_log_rate.exp() / area
}

/// Triggered part of the intensity at one space-time point.
///
/// Sums `α β e^{−β (t − t_j)} N₂((x, y) − s_j; σ²)` over history events
/// strictly earlier than `t`. The history's ascending times let the scan
/// stop at the first `t_j ≥ t`.
pub fn triggered_intensity_at(
    params: &HawkesParams, history: &ModelDataset, t: f64, x: f64, y: f64,
) -> f64 {
    let alpha = params.branching_ratio;
    let beta = params.decay_per_day;
    let sigma_sq = params.bandwidth_sq_deg;
    let kernel_norm = 2.0 * PI * sigma_sq;

    let mut total = 0.0;
    for ((&t_j, &x_j), &y_j) in
        history.times().iter().zip(history.xs().iter()).zip(history.ys().iter())
    {
        if t_j >= t {
            break;
        }
        let dx = x - x_j;
        let dy = y - y_j;
        let kernel = (-(dx * dx + dy * dy) / (2.0 * sigma_sq)).exp() / kernel_norm;
        total += alpha * beta * (-beta * (t - t_j)).exp() * kernel;
    }
    total
}

/// `ln λ(t_i, s_i)` for every event in `events`, excited by `history`.
///
/// For training, `events` and `history` are the same dataset (events excite
/// their successors); for held-out evaluation, `history` is the merged
/// training-plus-test set so earlier test events excite later ones.
pub fn event_log_intensities(
    params: &HawkesParams, events: &ModelDataset, history: &ModelDataset, area: f64,
) -> Array1<f64> {
    let background = background_density(params, area);
    let mut values = Array1::zeros(events.len());
    for (i, value) in values.iter_mut().enumerate() {
        let triggered = triggered_intensity_at(
            params,
            history,
            events.times()[i],
            events.xs()[i],
            events.ys()[i],
        );
        *value = (background + triggered).ln();
    }
    values
}

/// Per-event share of intensity owed to excitation, `triggered / λ`.
///
/// Zero means purely background, values near one mean the event sits in
/// another event's afterglow. Feeds the excitation-proportion diagnostic.
pub fn excitation_responsibilities(
    params: &HawkesParams, events: &ModelDataset, history: &ModelDataset, area: f64,
) -> Array1<f64> {
    let background = background_density(params, area);
    let mut values = Array1::zeros(events.len());
    for (i, value) in values.iter_mut().enumerate() {
        let triggered = triggered_intensity_at(
            params,
            history,
            events.times()[i],
            events.xs()[i],
            events.ys()[i],
        );
        *value = triggered / (background + triggered);
    }
    values
}

/// Integral of the intensity over the domain and the window `[from, to]`.
///
/// Exact under the unit-kernel-mass convention in the module header:
/// `exp(a₀)·(to − from) + α Σ_{t_j < to} (e^{−β (from − t_j)⁺} − e^{−β (to − t_j)})`.
/// History events inside the window contribute their full tail from their
/// own occurrence time.
pub fn integrated_intensity(
    params: &HawkesParams, history: &ModelDataset, from: f64, to: f64,
) -> f64 {
    let alpha = params.branching_ratio;
    let beta = params.decay_per_day;

    let mut total = params.background_log_rate.exp() * (to - from);
    for &t_j in history.times() {
        if t_j >= to {
            break;
        }
        let upper = (-beta * (to - t_j)).exp();
        let lower = (-beta * (from - t_j).max(0.0)).exp();
        total += alpha * (lower - upper);
    }
    total
}

/// Point-process log-likelihood of `events` over `[from, to]`.
///
/// `Σ_i ln λ(t_i, s_i) − ∫∫ λ`, with `history` as the exciting set for
/// both terms.
pub fn log_likelihood(
    params: &HawkesParams, events: &ModelDataset, history: &ModelDataset, area: f64, from: f64,
    to: f64,
) -> f64 {
    event_log_intensities(params, events, history, area).sum()
        - integrated_intensity(params, history, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Background-only intensities when no history precedes an event.
    // - The triggered term against a hand-computed single-exciter value.
    // - Strict-precedence: simultaneous events do not excite each other.
    // - The compensator's background, full-tail, and pre-window-tail terms.
    // - Assembly of the log-likelihood from its two pieces.
    //
    // These tests intentionally DO NOT cover:
    // - Prior terms or optimizer behavior (see `model::hawkes`).
    // -------------------------------------------------------------------------

    fn params() -> HawkesParams {
        HawkesParams::new(0.5, 0.4, 2.0, 0.02).unwrap()
    }

    fn dataset(times: Vec<f64>, xs: Vec<f64>, ys: Vec<f64>) -> ModelDataset {
        ModelDataset::new(Array1::from_vec(times), Array1::from_vec(xs), Array1::from_vec(ys))
            .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify an event with no earlier history sees pure background,
    // `ln λ = a₀ − ln |A|`.
    //
    // Given
    // -----
    // - One event and an empty history, area 2.0.
    //
    // Expect
    // ------
    // - `ln λ` equal to `0.5 − ln 2` within 1e-12.
    fn background_only_without_history() {
        let events = dataset(vec![1.0], vec![0.0], vec![0.0]);
        let history = dataset(vec![], vec![], vec![]);

        let values = event_log_intensities(&params(), &events, &history, 2.0);

        assert!((values[0] - (0.5 - 2.0_f64.ln())).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Check the triggered term against a hand-computed single-exciter
    // value, colocated in space.
    //
    // Given
    // -----
    // - History event at (t=0, origin); evaluation at (t=1, origin).
    //
    // Expect
    // ------
    // - `α β e^{−β} / (2π σ²)` within 1e-12.
    fn triggered_matches_hand_computation() {
        let history = dataset(vec![0.0], vec![0.0], vec![0.0]);

        let value = triggered_intensity_at(&params(), &history, 1.0, 0.0, 0.0);

        let expected = 0.4 * 2.0 * (-2.0_f64).exp() / (2.0 * PI * 0.02);
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure exciters are strictly earlier: a same-time history entry
    // contributes nothing.
    //
    // Given
    // -----
    // - History with events at t = 1.0 and t = 2.0; evaluation at t = 1.0.
    //
    // Expect
    // ------
    // - Zero triggered intensity.
    fn simultaneous_events_do_not_excite() {
        let history = dataset(vec![1.0, 2.0], vec![0.0, 0.0], vec![0.0, 0.0]);

        let value = triggered_intensity_at(&params(), &history, 1.0, 0.0, 0.0);

        assert_eq!(value, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the compensator's three contribution kinds: background,
    // full tail for an in-window event, clipped tail for a pre-window
    // event.
    //
    // Given
    // -----
    // - Empty history over [0, 3]; then one event at t=0 over [0, 3]; then
    //   the same event over [1, 3].
    //
    // Expect
    // ------
    // - `e^{0.5}·3`, plus `α(1 − e^{−3β})`, resp. `α(e^{−β} − e^{−3β})`,
    //   each within 1e-12.
    fn compensator_terms_are_exact() {
        let p = params();
        let empty = dataset(vec![], vec![], vec![]);
        let one = dataset(vec![0.0], vec![0.0], vec![0.0]);

        let background = integrated_intensity(&p, &empty, 0.0, 3.0);
        assert!((background - 0.5_f64.exp() * 3.0).abs() < 1e-12);

        let full_tail = integrated_intensity(&p, &one, 0.0, 3.0);
        let expected = 0.5_f64.exp() * 3.0 + 0.4 * (1.0 - (-6.0_f64).exp());
        assert!((full_tail - expected).abs() < 1e-12);

        let clipped = integrated_intensity(&p, &one, 1.0, 3.0);
        let expected = 0.5_f64.exp() * 2.0 + 0.4 * ((-2.0_f64).exp() - (-6.0_f64).exp());
        assert!((clipped - expected).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Confirm the log-likelihood is the event sum minus the compensator.
    //
    // Given
    // -----
    // - A single event exciting itself over [0, 2] with area 1.
    //
    // Expect
    // ------
    // - `a₀ − (e^{a₀}·2 + α(1 − e^{−2β}))` within 1e-12.
    fn log_likelihood_assembles_both_pieces() {
        let p = params();
        let events = dataset(vec![0.0], vec![0.0], vec![0.0]);

        let value = log_likelihood(&p, &events, &events, 1.0, 0.0, 2.0);

        let expected = 0.5 - (0.5_f64.exp() * 2.0 + 0.4 * (1.0 - (-4.0_f64).exp()));
        assert!((value - expected).abs() < 1e-12);
    }
}
