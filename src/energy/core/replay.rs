//! Full-log replay driver and innovation likelihood.
//!
//! Purpose
//! -------
//! Run the estimator over an entire observation sequence from scratch and
//! return one [`Estimate`] per observation. The same driver also exposes the
//! innovation sequence of the covariance form and its Gaussian
//! log-likelihood, which calibration maximizes.
//!
//! Key behaviors
//! -------------
//! - The first estimate echoes the seed state; every later observation
//!   advances the state once and appends the new snapshot.
//! - Calories attributed to an interval are those of the observation that
//!   opens it.
//! - [`UpdateStrategy::Covariance`]: predict, then robust update, for every
//!   pair of consecutive observations regardless of `dt`.
//! - [`UpdateStrategy::AlphaBeta`]: elapsed time is measured from the last
//!   observation that was actually applied; steps shorter than `min_dt`
//!   leave the state unchanged and keep accumulating time. The seed carries
//!   the measurement noise scales as its standard deviations.
//!
//! Invariants & assumptions
//! ------------------------
//! - Pure function of its inputs: no I/O, no state outside one call, output
//!   length equals input length.
//! - No input validation; non-finite inputs or parameters propagate into the
//!   estimates instead of raising.
//!
//! Downstream usage
//! ----------------
//! - [`EnergyModel`](crate::energy::models::tracker::EnergyModel) wraps
//!   [`replay`] for end users and [`likelihood_driver`] for calibration.
use crate::energy::{
    core::{
        alpha_beta::{self, alpha_beta_step},
        data::{Observation, elapsed_days},
        estimate::Estimate,
        options::{FilterOptions, UpdateStrategy},
        params::EnergyParams,
        predict::{Step, predict},
        state::LatentState,
        update::robust_update,
    },
    errors::{EnergyError, EnergyResult},
};
use chrono::NaiveDate;
use statrs::distribution::{Continuous, Normal};

/// One-step-ahead prediction error of the covariance form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Innovation {
    /// Date of the weigh-in being predicted.
    pub date: NaiveDate,
    /// `z − w_pred`.
    pub residual: f64,
    /// Innovation variance `S` of the final fixed-point pass.
    pub variance: f64,
}

/// Replay `observations` and return one estimate per observation.
///
/// Returns an empty vector for empty input.
pub fn replay(
    observations: &[Observation], params: &EnergyParams, filter: &FilterOptions,
) -> Vec<Estimate> {
    let Some(first) = observations.first() else {
        return Vec::new();
    };
    let mut state = match filter.strategy {
        UpdateStrategy::Covariance => LatentState::seed(first, params),
        UpdateStrategy::AlphaBeta { .. } => alpha_beta::seed_state(first, params),
    };
    let mut estimates = Vec::with_capacity(observations.len());
    estimates.push(state.estimate(first.date));

    let mut anchor = first.date;
    for pair in observations.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        match filter.strategy {
            UpdateStrategy::Covariance => {
                let step = Step::between(prev, next);
                let pred = predict(&state, &step, params);
                state = robust_update(&pred, next.weight, params, filter.fixed_point_iters).state;
            }
            UpdateStrategy::AlphaBeta { alpha } => {
                let step =
                    Step::new(elapsed_days(anchor, next.date), prev.calories, next.weight);
                if step.dt >= filter.min_dt {
                    state = alpha_beta_step(&state, &step, params, alpha);
                    anchor = next.date;
                }
            }
        }
        estimates.push(state.estimate(next.date));
    }
    estimates
}

/// Innovation sequence of the covariance form, one entry per observation
/// after the first.
///
/// Errors
/// ------
/// - `EnergyError::CalibrationUnsupported` for the alpha-beta strategy,
///   which has no innovation variance.
pub fn replay_innovations(
    observations: &[Observation], params: &EnergyParams, filter: &FilterOptions,
) -> EnergyResult<Vec<Innovation>> {
    if let UpdateStrategy::AlphaBeta { .. } = filter.strategy {
        return Err(EnergyError::CalibrationUnsupported { strategy: filter.strategy.label() });
    }
    let Some(first) = observations.first() else {
        return Ok(Vec::new());
    };
    let mut state = LatentState::seed(first, params);
    let mut innovations = Vec::with_capacity(observations.len().saturating_sub(1));
    for pair in observations.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let pred = predict(&state, &Step::between(prev, next), params);
        let correction = robust_update(&pred, next.weight, params, filter.fixed_point_iters);
        innovations.push(Innovation {
            date: next.date,
            residual: correction.residual,
            variance: correction.innovation_var,
        });
        state = correction.state;
    }
    Ok(innovations)
}

/// Gaussian log-likelihood of the innovation sequence, `Σ ln N(r; 0, S)`.
///
/// Errors
/// ------
/// - `EnergyError::InsufficientObservations` for fewer than two observations.
/// - `EnergyError::CalibrationUnsupported` for the alpha-beta strategy.
/// - `EnergyError::InvalidInnovationVariance` when some `S` is not finite
///   and > 0 (e.g. degenerate coefficients).
pub fn likelihood_driver(
    observations: &[Observation], params: &EnergyParams, filter: &FilterOptions,
) -> EnergyResult<f64> {
    if observations.len() < 2 {
        return Err(EnergyError::InsufficientObservations {
            needed: 2,
            found: observations.len(),
        });
    }
    let mut total = 0.0;
    for innovation in replay_innovations(observations, params, filter)? {
        let density = Normal::new(0.0, innovation.variance.sqrt())?;
        total += density.ln_pdf(innovation.residual);
    }
    Ok(total)
}
