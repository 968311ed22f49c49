//! Measurement update with self-tuning robust variance.
//!
//! Purpose
//! -------
//! Fold one weigh-in into a [`Prediction`]. The scale reading observes latent
//! weight directly; TDEE is only corrected through its covariance with weight.
//!
//! Key behaviors
//! -------------
//! - Measurement variance is relative to the reading, plus an inflation term
//!   driven by the residual: `R = (z·weight_obs_rsd)² + V_boost`.
//! - `V_boost` and the gain depend on each other, so they are solved by a
//!   fixed-point loop with a fixed pass count and no convergence test:
//!   ```text
//!   S   = P_ww + R(V_boost)
//!   K_w = P_ww / S,  K_t = P_wt / S
//!   V_boost ← ((1 − K_w)·r)² · variance_boost
//!   ```
//!   The gains applied are those of the last pass.
//! - A reading far from the prediction inflates its own variance and moves
//!   the state less, with no hard rejection threshold.
//!
//! Invariants & assumptions
//! ------------------------
//! - `passes >= 1`; [`FilterOptions`](crate::energy::core::options::FilterOptions)
//!   enforces this for replays.
//! - With non-negative variances, `0 <= K_w <= 1` and the updated variances
//!   stay non-negative up to round-off.
use crate::energy::core::{
    params::EnergyParams,
    predict::Prediction,
    state::{LatentState, StateCovariance},
};

/// Result of one measurement update.
///
/// Besides the new state it keeps the final-pass innovation quantities, which
/// feed the innovation log-likelihood used by calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    pub state: LatentState,
    /// `r = z − w_pred`.
    pub residual: f64,
    /// `S` of the last pass.
    pub innovation_var: f64,
    pub gain_weight: f64,
    pub gain_tdee: f64,
    /// Inflation carried into the last pass.
    pub variance_boost: f64,
}

/// Apply the robust update for the reading `measured` to `pred`.
///
/// Parameters
/// ----------
/// - `pred`: output of [`predict`](crate::energy::core::predict::predict).
/// - `measured`: scale reading closing the interval.
/// - `params`: supplies `weight_obs_rsd` and `variance_boost`.
/// - `passes`: number of gain/inflation evaluations (25 by default).
///
/// Notes
/// -----
/// - `passes == 0` is treated as a single pass.
pub fn robust_update(
    pred: &Prediction, measured: f64, params: &EnergyParams, passes: usize,
) -> Correction {
    let p = &pred.cov;
    let base_r = (measured * params.weight_obs_rsd).powi(2);
    let residual = measured - pred.weight;

    let mut boost = 0.0;
    let (mut s, mut k_w, mut k_t) = gains(p, base_r, boost);
    for _ in 1..passes {
        boost = ((1.0 - k_w) * residual).powi(2) * params.variance_boost;
        (s, k_w, k_t) = gains(p, base_r, boost);
    }

    let state = LatentState {
        tdee: pred.tdee + k_t * residual,
        weight: pred.weight + k_w * residual,
        cov: StateCovariance {
            tt: p.tt - k_t * p.wt,
            wt: (1.0 - k_w) * p.wt,
            ww: (1.0 - k_w) * p.ww,
        },
    };
    Correction {
        state,
        residual,
        innovation_var: s,
        gain_weight: k_w,
        gain_tdee: k_t,
        variance_boost: boost,
    }
}

// ---- Helper Methods ----

fn gains(p: &StateCovariance, base_r: f64, boost: f64) -> (f64, f64, f64) {
    let s = p.ww + base_r + boost;
    (s, p.ww / s, p.wt / s)
}
