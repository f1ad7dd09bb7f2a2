//! Numerical stability utilities.
//!
//! Provides safe implementations of the nonlinear transforms the model
//! layer uses to map between constrained parameters and the unconstrained
//! optimizer space. The functions here follow guarded strategies similar
//! to those in major ML libraries, using explicit branch points to keep
//! `f64` arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`BOUNDARY_EPS`]: a small ε buffer (default 1e-12) keeping
//!   unit-interval parameters strictly inside `(0, 1)`, where Beta prior
//!   densities stay finite.
//! - [`safe_logistic(x)`]: stable sigmoid, mapping ℝ → (0, 1) without
//!   overflow in either tail.
//! - [`safe_logit(p)`]: inverse of the logistic, mapping [0, 1] → ℝ by
//!   clamping to the ε-interior first.

/// Interior buffer for unit-interval parameters.
///
/// Values produced by [`safe_logistic`] and consumed by Beta prior
/// densities are clamped to `[ε, 1 - ε]`. At the exact boundaries the Beta
/// log-density diverges to −∞, which would poison the whole objective; the
/// buffer keeps evaluation finite while moving the value by less than any
/// tolerance the fit cares about.
pub const BOUNDARY_EPS: f64 = 1e-12;

/// Numerically stable logistic: `logistic(x) = 1 / (1 + exp(-x))`.
///
/// Branches on the sign of `x` so the exponential is always taken of a
/// non-positive argument, avoiding overflow for large `|x|`:
///
/// - For `x >= 0`: `1 / (1 + exp(-x))`.
/// - For `x < 0`: `exp(x) / (1 + exp(x))`.
///
/// The result is then clamped to `[BOUNDARY_EPS, 1 - BOUNDARY_EPS]` so
/// downstream densities on `(0, 1)` stay finite.
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `logistic(x)` as `f64`, strictly inside `(0, 1)`.
pub fn safe_logistic(x: f64) -> f64 {
    let p = if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    };
    p.clamp(BOUNDARY_EPS, 1.0 - BOUNDARY_EPS)
}

/// Stable inverse of the logistic on `[0, 1]`: solves for `t` in
/// `logistic(t) = p`, returning `t = ln(p / (1 - p))`.
///
/// Direct evaluation diverges at the boundaries, so the input is clamped
/// to the ε-interior `[BOUNDARY_EPS, 1 - BOUNDARY_EPS]` first; `0` and `1`
/// therefore map to large finite values rather than ±∞.
///
/// # Parameters
/// - `p`: a probability-like value in `[0, 1]`.
///
/// # Returns
/// - `t` such that `safe_logistic(t) = clamp(p)`.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(BOUNDARY_EPS, 1.0 - BOUNDARY_EPS);
    (p / (1.0 - p)).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement with the naive formulas on a safe grid.
    // - Tail behavior without overflow.
    // - Round-trip consistency of logit ∘ logistic.
    // - Boundary clamping.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify `safe_logistic` agrees with the naive formula on moderate
    // inputs and stays finite in both tails.
    //
    // Given
    // -----
    // - A grid of moderate values, plus ±800.
    //
    // Expect
    // ------
    // - Agreement within 1e-15 on the grid; tail values strictly inside
    //   (0, 1).
    fn safe_logistic_matches_naive_and_bounds_tails() {
        for x in [-5.0, -1.0, 0.0, 0.5, 3.0] {
            let naive = 1.0 / (1.0 + (-x as f64).exp());
            assert!((safe_logistic(x) - naive).abs() < 1e-15, "x = {x}");
        }
        assert_eq!(safe_logistic(0.0), 0.5);

        let hi = safe_logistic(800.0);
        let lo = safe_logistic(-800.0);
        assert!(hi < 1.0 && hi > 0.99);
        assert!(lo > 0.0 && lo < 0.01);
    }

    #[test]
    // Purpose
    // -------
    // Verify logit inverts logistic away from the clamp region.
    //
    // Given
    // -----
    // - Values of `t` across several orders of magnitude.
    //
    // Expect
    // ------
    // - `safe_logit(safe_logistic(t))` agrees with `t` within 1e-9.
    fn logit_inverts_logistic() {
        for t in [-10.0, -2.5, 0.0, 0.1, 7.0] {
            let round_trip = safe_logit(safe_logistic(t));
            assert!((round_trip - t).abs() < 1e-9, "t = {t}: got {round_trip}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify boundary inputs map to large finite values.
    //
    // Given
    // -----
    // - `p = 0.0` and `p = 1.0`.
    //
    // Expect
    // ------
    // - Finite outputs of opposite sign.
    fn logit_clamps_boundaries_to_finite_values() {
        let at_zero = safe_logit(0.0);
        let at_one = safe_logit(1.0);

        assert!(at_zero.is_finite() && at_zero < -20.0);
        assert!(at_one.is_finite() && at_one > 20.0);
    }
}
