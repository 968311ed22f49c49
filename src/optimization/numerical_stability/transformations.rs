//! Softplus and its inverse with overflow guards.
//!
//! Calibration keeps every noise coefficient strictly positive by optimizing
//! `θ = softplus⁻¹(coefficient)` instead of the coefficient itself.
//! Both directions switch to the identity above [`SOFTPLUS_CUTOFF`], where
//! `exp(x)` would dominate and `ln(1 + e^x) = x` to machine precision.

/// Above this input both transforms return `x` unchanged.
pub const SOFTPLUS_CUTOFF: f64 = 20.0;

/// `softplus(x) = ln(1 + exp(x))`, mapping ℝ → (0, ∞).
pub fn safe_softplus(x: f64) -> f64 {
    if x > SOFTPLUS_CUTOFF { x } else { x.exp().ln_1p() }
}

/// Inverse of [`safe_softplus`] on `(0, ∞)`: `ln(exp(x) − 1)`.
///
/// `x` must be finite and > 0; `0` maps to `-inf` and negatives to NaN.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > SOFTPLUS_CUTOFF { x } else { x.exp_m1().ln() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // The inverse recovers the small coefficients used by the estimator and
    // large values past the cutoff.
    //
    // Given
    // -----
    // - 1e-4 (drift), 0.004 (scale), 1/6 (boost), 3.0, 25.0.
    //
    // Expect
    // ------
    // - softplus(softplus⁻¹(x)) = x to 1e-12 relative.
    fn inverse_recovers_coefficients() {
        for x in [1e-4, 0.004, 1.0 / 6.0, 3.0, 25.0] {
            assert_relative_eq!(safe_softplus(safe_softplus_inv(x)), x, max_relative = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Outputs stay positive and finite across a wide input range.
    //
    // Given
    // -----
    // - θ from −30 to 700.
    //
    // Expect
    // ------
    // - softplus(θ) > 0 and finite; softplus(0) = ln 2.
    fn softplus_is_positive_and_finite() {
        for theta in [-30.0, -5.0, 0.0, 5.0, 19.9, 20.1, 700.0] {
            let y = safe_softplus(theta);
            assert!(y > 0.0 && y.is_finite(), "softplus({theta}) = {y}");
        }
        assert_relative_eq!(safe_softplus(0.0), std::f64::consts::LN_2, max_relative = 1e-15);
    }
}
