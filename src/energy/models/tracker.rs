//! Energy model: replay, goal advice, and likelihood-based calibration.
//!
//! [`EnergyModel`] bundles a parameter set with filter and optimizer options.
//! Estimation is a full replay of the supplied observations every call.
//! Calibration tunes the five noise coefficients by maximizing the Gaussian
//! log-likelihood of the innovation sequence in softplus-mapped θ space:
//!
//! `θ = softplus⁻¹(tdee_rsd, calorie_rsd, weight_obs_rsd, weight_drift_rsd, variance_boost)`.
//!
//! No analytic gradient is provided; the optimizer differences the cost.
//! After a successful [`EnergyModel::calibrate`] the calibrated parameters
//! replace the configured ones for every later estimate.
use crate::{
    energy::{
        core::{
            data::{Observation, ObservationLog},
            estimate::Estimate,
            options::EnergyOptions,
            params::{CALIBRATED_DIM, EnergyParams},
            replay::{likelihood_driver, replay},
            validation::{validate_calibration_input, validate_theta},
        },
        errors::{EnergyError, EnergyResult},
        goal::{GoalAdvice, goal_advice},
    },
    optimization::{
        errors::OptResult,
        loglik_optimizer::{LogLikelihood, OptimOutcome, Theta, maximize},
    },
};

/// User-facing estimator.
///
/// `results` and `calibrated_params` are populated by
/// [`EnergyModel::calibrate`]; both stay `None` until then.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyModel {
    /// Configured parameters.
    pub params: EnergyParams,
    /// Filter and optimizer options.
    pub options: EnergyOptions,
    /// Outcome of the last calibration.
    pub results: Option<OptimOutcome>,
    /// Parameters produced by the last calibration.
    pub calibrated_params: Option<EnergyParams>,
}

impl EnergyModel {
    pub fn new(params: EnergyParams, options: EnergyOptions) -> Self {
        EnergyModel { params, options, results: None, calibrated_params: None }
    }

    /// Calibrated parameters if available, otherwise the configured ones.
    pub fn active_params(&self) -> &EnergyParams {
        self.calibrated_params.as_ref().unwrap_or(&self.params)
    }

    /// Errors
    /// ------
    /// - `EnergyError::NotCalibrated` before a successful calibration.
    pub fn calibrated(&self) -> EnergyResult<&EnergyParams> {
        self.calibrated_params.as_ref().ok_or(EnergyError::NotCalibrated)
    }

    /// One estimate per observation, replayed from scratch with
    /// [`active_params`](Self::active_params).
    pub fn estimate(&self, observations: &[Observation]) -> Vec<Estimate> {
        replay(observations, self.active_params(), &self.options.filter)
    }

    /// Estimate for the last observation, `None` for an empty slice.
    pub fn latest(&self, observations: &[Observation]) -> Option<Estimate> {
        self.estimate(observations).pop()
    }

    /// Goal advice from the latest estimated weight and TDEE.
    ///
    /// Returns `None` for an empty slice. Without a goal weight the advice is
    /// the "set a goal" prompt with zero calories.
    pub fn advise(&self, observations: &[Observation]) -> Option<GoalAdvice> {
        let params = self.active_params();
        self.latest(observations).map(|est| {
            goal_advice(est.weight, params.goal_weight, est.tdee, params.fat_energy_density)
        })
    }

    /// Maximize the innovation log-likelihood over the noise coefficients.
    ///
    /// Starts from the active parameters, so repeated calls continue from the
    /// previous optimum. Seed TDEE, fat energy density and goal weight are
    /// carried over unchanged.
    ///
    /// Errors
    /// ------
    /// - `OptError::NonPositiveCalibrationStart` when a starting coefficient
    ///   is not > 0 (softplus cannot represent it).
    /// - `OptError::CalibrationUnsupported` for the alpha-beta strategy.
    /// - `OptError::InsufficientObservations` for fewer than two entries.
    /// - Optimizer failures from `maximize`.
    pub fn calibrate(&mut self, log: &ObservationLog) -> OptResult<()> {
        let theta0 = self.active_params().to_theta()?;
        let outcome = maximize(&*self, theta0, log, &self.options.mle_opts)?;
        self.calibrated_params = Some(self.params.with_theta(outcome.theta_hat.view())?);
        self.results = Some(outcome);
        Ok(())
    }
}

impl LogLikelihood for EnergyModel {
    type Data = ObservationLog;

    /// `Σ ln N(r; 0, S)` over the innovations replayed with the coefficients
    /// `softplus(θ)`.
    ///
    /// Errors
    /// ------
    /// - θ mapping errors (length, non-finite entries).
    /// - `OptError::InvalidInnovationVariance` if a step's variance is not
    ///   positive and finite.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let params = self.params.with_theta(theta.view())?;
        Ok(likelihood_driver(data.entries(), &params, &self.options.filter)?)
    }

    /// Require the covariance strategy, two observations, and a finite θ of
    /// length five.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        validate_calibration_input(data, &self.options.filter.strategy)?;
        validate_theta(theta.view(), CALIBRATED_DIM)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        energy::core::options::{FilterOptions, UpdateStrategy},
        optimization::errors::OptError,
    };
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Facade: parameter selection, latest estimate, advice.
    // - `LogLikelihood` conformance: `check` guards and `value` agreement with
    //   the replay likelihood.
    //
    // Full calibration runs live in tests/ (they need longer synthetic logs).
    // -------------------------------------------------------------------------

    fn log(days: usize) -> ObservationLog {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let entries = (0..days)
            .map(|i| {
                let wobble = if i % 2 == 0 { 0.15 } else { -0.15 };
                Observation::new(
                    start + Duration::days(i as i64),
                    80.0 - 0.05 * i as f64 + wobble,
                    2000.0,
                )
            })
            .collect();
        ObservationLog::new(entries).expect("synthetic log is valid")
    }

    #[test]
    // Purpose
    // -------
    // Before calibration the configured parameters drive estimation; after,
    // the calibrated ones do.
    //
    // Given
    // -----
    // - A model with defaults, then a calibrated set with a larger tdee_rsd.
    //
    // Expect
    // ------
    // - `calibrated()` is `NotCalibrated` at first.
    // - `estimate` matches a direct replay with whichever set is active.
    fn estimate_uses_active_parameters() {
        // Arrange
        let data = log(20);
        let mut model = EnergyModel::new(EnergyParams::default(), EnergyOptions::default());
        let tuned = EnergyParams { tdee_rsd: 0.05, ..EnergyParams::default() };

        // Act / Assert
        assert_eq!(model.calibrated(), Err(EnergyError::NotCalibrated));
        assert_eq!(
            model.estimate(data.entries()),
            replay(data.entries(), &EnergyParams::default(), &FilterOptions::default())
        );

        model.calibrated_params = Some(tuned);
        assert_eq!(model.active_params(), &tuned);
        assert_eq!(
            model.estimate(data.entries()),
            replay(data.entries(), &tuned, &FilterOptions::default())
        );
    }

    #[test]
    // Purpose
    // -------
    // `latest` and `advise` read the final estimate and the goal weight.
    //
    // Given
    // -----
    // - A 30-day log, goal 70 kg; the same model on an empty slice.
    //
    // Expect
    // ------
    // - Advice is a full 500 kcal deficit under the latest TDEE.
    // - `None` for an empty slice.
    fn advise_uses_latest_estimate_and_goal() {
        // Arrange
        let data = log(30);
        let params = EnergyParams { goal_weight: 70.0, ..EnergyParams::default() };
        let model = EnergyModel::new(params, EnergyOptions::default());

        // Act
        let latest = model.latest(data.entries()).expect("non-empty log");
        let advice = model.advise(data.entries()).expect("non-empty log");

        // Assert
        assert_eq!(latest.date, data.last().expect("non-empty").date);
        assert_relative_eq!(advice.calories, latest.tdee - 500.0, max_relative = 1e-12);
        assert!(advice.message.starts_with("To lose weight"));
        assert!(model.advise(&[]).is_none());
    }

    #[test]
    // Purpose
    // -------
    // `check` rejects inputs that cannot be calibrated.
    //
    // Given
    // -----
    // - A one-entry log; an alpha-beta model; a length-3 θ.
    //
    // Expect
    // ------
    // - `InsufficientObservations`, `CalibrationUnsupported`,
    //   `ThetaLengthMismatch`.
    fn check_guards_calibration_inputs() {
        // Arrange
        let model = EnergyModel::new(EnergyParams::default(), EnergyOptions::default());
        let alpha_beta = EnergyModel::new(
            EnergyParams::default(),
            EnergyOptions {
                filter: FilterOptions::with_strategy(UpdateStrategy::AlphaBeta { alpha: 0.1 })
                    .expect("valid options"),
                ..EnergyOptions::default()
            },
        );
        let theta = EnergyParams::default().to_theta().expect("positive defaults");

        // Act / Assert
        assert_eq!(
            model.check(&theta, &log(1)),
            Err(OptError::InsufficientObservations { needed: 2, found: 1 })
        );
        assert_eq!(
            alpha_beta.check(&theta, &log(5)),
            Err(OptError::CalibrationUnsupported { strategy: "alpha-beta" })
        );
        assert_eq!(
            model.check(&array![0.0, 0.0, 0.0], &log(5)),
            Err(OptError::ThetaLengthMismatch { expected: 5, actual: 3 })
        );
        assert!(model.check(&theta, &log(5)).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `value` at θ = softplus⁻¹(defaults) equals the replay likelihood with
    // the defaults.
    //
    // Given
    // -----
    // - A 40-day log.
    //
    // Expect
    // ------
    // - Agreement to 1e-10 relative.
    fn value_matches_replay_likelihood() {
        // Arrange
        let data = log(40);
        let model = EnergyModel::new(EnergyParams::default(), EnergyOptions::default());
        let theta = EnergyParams::default().to_theta().expect("positive defaults");

        // Act
        let value = model.value(&theta, &data).expect("likelihood evaluates");
        let direct = likelihood_driver(
            data.entries(),
            &EnergyParams::default(),
            &FilterOptions::default(),
        )
        .expect("likelihood evaluates");

        // Assert
        assert_relative_eq!(value, direct, max_relative = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Calibration refuses a zero starting coefficient before running.
    //
    // Given
    // -----
    // - variance_boost = 0.
    //
    // Expect
    // ------
    // - `NonPositiveCalibrationStart` and no stored results.
    fn calibrate_rejects_zero_start() {
        // Arrange
        let params = EnergyParams { variance_boost: 0.0, ..EnergyParams::default() };
        let mut model = EnergyModel::new(params, EnergyOptions::default());

        // Act
        let err = model.calibrate(&log(10)).expect_err("zero start cannot be mapped");

        // Assert
        assert_eq!(
            err,
            OptError::NonPositiveCalibrationStart { name: "variance_boost", value: 0.0 }
        );
        assert!(model.results.is_none() && model.calibrated_params.is_none());
    }
}
