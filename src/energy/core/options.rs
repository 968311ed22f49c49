//! Runtime options for replay and calibration.
//!
//! Purpose
//! -------
//! Select how the estimator folds each weigh-in into its state
//! ([`UpdateStrategy`]), bound its inner fixed-point loop, and bundle the
//! optimizer configuration used when calibrating noise coefficients.
//!
//! Key behaviors
//! -------------
//! - [`UpdateStrategy::Covariance`] is the reference form: linear-Gaussian
//!   prediction plus the self-tuning robust update.
//! - [`UpdateStrategy::AlphaBeta`] replaces the covariance-derived gain with
//!   a fixed weight gain and its critically damped TDEE gain.
//! - [`FilterOptions::new`] validates the pass count, the skip threshold for
//!   degenerate time steps and the alpha gain.
//! - [`EnergyOptions`] pairs filter options with [`MLEOptions`].
//!
//! Conventions
//! -----------
//! - `min_dt` only affects the alpha-beta strategy, whose TDEE gain divides
//!   by the elapsed time. The covariance form handles `dt = 0` directly.
//! - Strategy names parse case-insensitively.
use crate::{
    energy::errors::{EnergyError, EnergyResult},
    optimization::loglik_optimizer::MLEOptions,
};
use std::str::FromStr;

/// Default number of fixed-point passes in the robust update.
pub const DEFAULT_FIXED_POINT_ITERS: usize = 25;

/// Default elapsed time (days) below which an alpha-beta step is skipped.
pub const DEFAULT_MIN_DT: f64 = 0.01;

/// Default weight gain of the alpha-beta tracker.
pub const DEFAULT_ALPHA: f64 = 1.0 / 16.0;

/// How each observation updates the latent state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum UpdateStrategy {
    /// Covariance-tracking prediction with residual-inflated measurement noise.
    #[default]
    Covariance,
    /// Fixed-gain tracker with weight gain `alpha` in (0, 1).
    AlphaBeta { alpha: f64 },
}

impl UpdateStrategy {
    /// Short label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            UpdateStrategy::Covariance => "covariance",
            UpdateStrategy::AlphaBeta { .. } => "alpha-beta",
        }
    }
}

impl FromStr for UpdateStrategy {
    type Err = EnergyError;

    /// Parse a strategy name. `"covariance"` and `"kalman"` select the
    /// covariance form; `"alpha-beta"` and `"alphabeta"` select the
    /// fixed-gain tracker with [`DEFAULT_ALPHA`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "covariance" | "kalman" => Ok(UpdateStrategy::Covariance),
            "alpha-beta" | "alphabeta" => Ok(UpdateStrategy::AlphaBeta { alpha: DEFAULT_ALPHA }),
            _ => Err(EnergyError::UnknownStrategy {
                name: s.to_string(),
                reason: "Valid options are 'covariance' or 'alpha-beta'.",
            }),
        }
    }
}

/// Filter-level configuration.
///
/// Fields
/// ------
/// - `strategy`: update rule, see [`UpdateStrategy`].
/// - `fixed_point_iters`: passes of the gain/variance fixed point (>= 1).
/// - `min_dt`: alpha-beta steps shorter than this (days) leave the state
///   untouched and let elapsed time accumulate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOptions {
    pub strategy: UpdateStrategy,
    pub fixed_point_iters: usize,
    pub min_dt: f64,
}

impl FilterOptions {
    /// Create validated filter options.
    ///
    /// Errors
    /// ------
    /// - `EnergyError::InvalidFixedPointIters` if `fixed_point_iters == 0`.
    /// - `EnergyError::InvalidMinDt` unless `min_dt` is finite and > 0.
    /// - `EnergyError::InvalidAlphaGain` unless `0 < alpha < 1`.
    pub fn new(
        strategy: UpdateStrategy, fixed_point_iters: usize, min_dt: f64,
    ) -> EnergyResult<Self> {
        if fixed_point_iters == 0 {
            return Err(EnergyError::InvalidFixedPointIters {
                value: fixed_point_iters,
                reason: "At least one pass is required.",
            });
        }
        if !min_dt.is_finite() {
            return Err(EnergyError::InvalidMinDt { value: min_dt, reason: "Must be finite." });
        }
        if min_dt <= 0.0 {
            return Err(EnergyError::InvalidMinDt { value: min_dt, reason: "Must be positive." });
        }
        if let UpdateStrategy::AlphaBeta { alpha } = strategy {
            if !alpha.is_finite() || alpha <= 0.0 || alpha >= 1.0 {
                return Err(EnergyError::InvalidAlphaGain {
                    value: alpha,
                    reason: "Gain must lie strictly between 0 and 1.",
                });
            }
        }
        Ok(FilterOptions { strategy, fixed_point_iters, min_dt })
    }

    /// Default options with a different strategy.
    pub fn with_strategy(strategy: UpdateStrategy) -> EnergyResult<Self> {
        FilterOptions::new(strategy, DEFAULT_FIXED_POINT_ITERS, DEFAULT_MIN_DT)
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            strategy: UpdateStrategy::Covariance,
            fixed_point_iters: DEFAULT_FIXED_POINT_ITERS,
            min_dt: DEFAULT_MIN_DT,
        }
    }
}

/// Options for an [`EnergyModel`](crate::energy::models::tracker::EnergyModel).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnergyOptions {
    /// Replay configuration.
    pub filter: FilterOptions,
    /// Optimizer configuration used by calibration.
    pub mle_opts: MLEOptions,
}

impl EnergyOptions {
    pub fn new(filter: FilterOptions, mle_opts: MLEOptions) -> Self {
        EnergyOptions { filter, mle_opts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Strategy parsing (aliases, case, unknown names).
    // - `FilterOptions::new` validation branches and defaults.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Strategy names are case-insensitive and accept the documented aliases.
    //
    // Given
    // -----
    // - "Kalman", "COVARIANCE", "alpha-beta", "AlphaBeta", "median".
    //
    // Expect
    // ------
    // - Covariance twice, AlphaBeta with the default gain twice, then an error.
    fn strategy_parses_aliases() {
        assert_eq!("Kalman".parse::<UpdateStrategy>(), Ok(UpdateStrategy::Covariance));
        assert_eq!("COVARIANCE".parse::<UpdateStrategy>(), Ok(UpdateStrategy::Covariance));
        assert_eq!(
            "alpha-beta".parse::<UpdateStrategy>(),
            Ok(UpdateStrategy::AlphaBeta { alpha: DEFAULT_ALPHA })
        );
        assert_eq!(
            "AlphaBeta".parse::<UpdateStrategy>(),
            Ok(UpdateStrategy::AlphaBeta { alpha: DEFAULT_ALPHA })
        );
        assert!(matches!(
            "median".parse::<UpdateStrategy>(),
            Err(EnergyError::UnknownStrategy { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Each invalid field is rejected with its own variant.
    //
    // Given
    // -----
    // - Zero passes; NaN and negative min_dt; alpha of 0 and 1.
    //
    // Expect
    // ------
    // - `InvalidFixedPointIters`, `InvalidMinDt` (x2), `InvalidAlphaGain` (x2).
    fn filter_options_reject_invalid_fields() {
        assert!(matches!(
            FilterOptions::new(UpdateStrategy::Covariance, 0, 0.01),
            Err(EnergyError::InvalidFixedPointIters { value: 0, .. })
        ));
        assert!(matches!(
            FilterOptions::new(UpdateStrategy::Covariance, 25, f64::NAN),
            Err(EnergyError::InvalidMinDt { .. })
        ));
        assert!(matches!(
            FilterOptions::new(UpdateStrategy::Covariance, 25, -1.0),
            Err(EnergyError::InvalidMinDt { .. })
        ));
        assert!(matches!(
            FilterOptions::new(UpdateStrategy::AlphaBeta { alpha: 0.0 }, 25, 0.01),
            Err(EnergyError::InvalidAlphaGain { .. })
        ));
        assert!(matches!(
            FilterOptions::new(UpdateStrategy::AlphaBeta { alpha: 1.0 }, 25, 0.01),
            Err(EnergyError::InvalidAlphaGain { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Defaults match the documented constants and pass validation.
    //
    // Given
    // -----
    // - `FilterOptions::default()` and `with_strategy(Covariance)`.
    //
    // Expect
    // ------
    // - 25 passes, min_dt 0.01, covariance strategy; both constructions agree.
    fn defaults_are_valid_and_consistent() {
        let defaults = FilterOptions::default();
        assert_eq!(defaults.fixed_point_iters, 25);
        assert_eq!(defaults.min_dt, 0.01);
        assert_eq!(defaults.strategy, UpdateStrategy::Covariance);
        assert_eq!(FilterOptions::with_strategy(UpdateStrategy::Covariance), Ok(defaults));
    }
}
