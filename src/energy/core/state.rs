//! Latent state of one replay: point estimates plus joint uncertainty.
//!
//! A [`LatentState`] lives only for the duration of a replay. It is seeded
//! from the first observation, advanced once per later observation, and
//! snapshotted into an [`Estimate`] after every step.
use crate::energy::core::{data::Observation, estimate::Estimate, params::EnergyParams};
use chrono::NaiveDate;

/// Symmetric 2×2 covariance of `(tdee, weight)`.
///
/// `tt` is the TDEE variance (kcal²/day²), `ww` the weight variance (kg²) and
/// `wt` the cross term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateCovariance {
    pub tt: f64,
    pub wt: f64,
    pub ww: f64,
}

/// Working state of the estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatentState {
    pub tdee: f64,
    pub weight: f64,
    pub cov: StateCovariance,
}

impl LatentState {
    /// Seed a replay from its first observation.
    ///
    /// TDEE comes from `params.seed_tdee`. Variances apply the relative noise
    /// coefficients to the seed values once, with no elapsed-time terms:
    ///
    /// - `P_tt = (tdee·tdee_rsd)² + (tdee·calorie_rsd)²`
    /// - `P_ww = (weight·weight_obs_rsd)² + (weight·weight_drift_rsd)²`
    /// - `P_wt = 0`
    pub fn seed(first: &Observation, params: &EnergyParams) -> Self {
        let tdee = params.seed_tdee(first.calories);
        let weight = first.weight;
        let cov = StateCovariance {
            tt: (tdee * params.tdee_rsd).powi(2) + (tdee * params.calorie_rsd).powi(2),
            wt: 0.0,
            ww: (weight * params.weight_obs_rsd).powi(2)
                + (weight * params.weight_drift_rsd).powi(2),
        };
        LatentState { tdee, weight, cov }
    }

    pub fn sd_tdee(&self) -> f64 {
        std_dev(self.cov.tt)
    }

    pub fn sd_weight(&self) -> f64 {
        std_dev(self.cov.ww)
    }

    /// Snapshot the state as the estimate for `date`.
    pub fn estimate(&self, date: NaiveDate) -> Estimate {
        Estimate {
            date,
            weight: self.weight,
            tdee: self.tdee,
            sd_weight: self.sd_weight(),
            sd_tdee: self.sd_tdee(),
        }
    }
}

// Round-off can leave a variance a hair below zero; NaN still propagates.
fn std_dev(variance: f64) -> f64 {
    if variance < 0.0 { 0.0 } else { variance.sqrt() }
}
