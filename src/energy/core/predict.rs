//! State model: how `(tdee, weight)` evolve between two weigh-ins.
//!
//! Purpose
//! -------
//! Propagate the latent state and its covariance across one interval using
//! the energy-balance law, before the interval's closing weigh-in is folded
//! in by the measurement update.
//!
//! Key behaviors
//! -------------
//! - Weight moves by the caloric surplus over the interval:
//!   `w_pred = w + (calories − tdee)/density · dt`.
//! - TDEE is an unforced random walk: `tdee_pred = tdee`.
//! - Process noise is heteroscedastic (see [`process_noise`]).
//! - Covariance follows the linear-Gaussian rule with `F = −dt/density`,
//!   the sensitivity of predicted weight to TDEE error.
//!
//! Invariants & assumptions
//! ------------------------
//! - `dt` may be zero or negative (same-day or out-of-order rows). Nothing
//!   here divides by `dt`, so such steps stay finite.
//! - A non-positive `fat_energy_density` yields non-finite output; callers
//!   validate parameters upstream.
use crate::energy::core::{
    data::{Observation, elapsed_days},
    params::EnergyParams,
    state::{LatentState, StateCovariance},
};

/// One replay interval.
///
/// - `dt`: elapsed days from the start to the end of the interval.
/// - `calories`: intake attributed to the interval (the value reported on the
///   day the interval starts).
/// - `measured_weight`: scale reading that closes the interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub dt: f64,
    pub calories: f64,
    pub measured_weight: f64,
}

impl Step {
    pub fn new(dt: f64, calories: f64, measured_weight: f64) -> Self {
        Step { dt, calories, measured_weight }
    }

    /// Interval from `prev` to `next`: yesterday's intake explains today's weight.
    pub fn between(prev: &Observation, next: &Observation) -> Self {
        Step::new(elapsed_days(prev.date, next.date), prev.calories, next.weight)
    }
}

/// Predicted state immediately before the measurement update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub tdee: f64,
    pub weight: f64,
    pub cov: StateCovariance,
}

/// Process-noise variances `(Q_tt, Q_ww)` for one step.
///
/// - `Q_tt = (calories · tdee_rsd)²`
/// - `Q_ww = (measured_weight · weight_drift_rsd)²
///   + (calories · dt / density · calorie_rsd)²`
pub fn process_noise(step: &Step, params: &EnergyParams) -> (f64, f64) {
    let q_tt = (step.calories * params.tdee_rsd).powi(2);
    let drift = step.measured_weight * params.weight_drift_rsd;
    let intake = step.calories * step.dt / params.fat_energy_density * params.calorie_rsd;
    (q_tt, drift.powi(2) + intake.powi(2))
}

/// Propagate `state` across `step`.
pub fn predict(state: &LatentState, step: &Step, params: &EnergyParams) -> Prediction {
    let density = params.fat_energy_density;
    let f = -step.dt / density;
    let (q_tt, q_ww) = process_noise(step, params);
    let p = &state.cov;

    Prediction {
        tdee: state.tdee,
        weight: state.weight + (step.calories - state.tdee) / density * step.dt,
        cov: StateCovariance {
            tt: p.tt + q_tt,
            wt: p.wt + f * p.tt,
            ww: f * f * p.tt + 2.0 * f * p.wt + p.ww + q_ww,
        },
    }
}
