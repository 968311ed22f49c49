//! Parameter set for the energy-balance estimator.
//!
//! Purpose
//! -------
//! Hold the coefficients that drive one replay: the optional TDEE seed, the
//! energy density of body fat, the relative noise coefficients of the state
//! and measurement models, the outlier inflation scale, and the user's goal.
//!
//! Key behaviors
//! -------------
//! - [`EnergyParams::default`] reproduces the collaborator's shipped defaults.
//! - [`EnergyParams::validate`] is the configuration-save check; the replay
//!   engine never calls it and will propagate NaN for nonsensical values.
//! - [`EnergyParams::to_theta`] / [`EnergyParams::with_theta`] map the five
//!   noise coefficients to and from an unconstrained optimizer vector through
//!   softplus, keeping every coefficient strictly positive during calibration.
//!
//! Conventions
//! -----------
//! - "rsd" coefficients are relative standard deviations: they multiply the
//!   magnitude of the quantity they perturb (calories, weight) to give an
//!   absolute standard deviation.
//! - Sentinel `<= 0` for `initial_tdee` and `goal_weight` means "unset".
//! - With the `serde` feature the struct reads and writes the collaborator's
//!   params-file keys; missing keys take their default.
use crate::{
    energy::{
        core::validation::validate_theta,
        errors::{ParamError, ParamResult},
    },
    optimization::numerical_stability::transformations::{safe_softplus, safe_softplus_inv},
};
use ndarray::{Array1, ArrayView1};

/// Number of coefficients tuned by calibration.
pub const CALIBRATED_DIM: usize = 5;

/// Names of the calibrated coefficients in theta order.
pub const CALIBRATED_NAMES: [&str; CALIBRATED_DIM] =
    ["tdee_rsd", "calorie_rsd", "weight_obs_rsd", "weight_drift_rsd", "variance_boost"];

/// Coefficients for one estimation run.
///
/// Fields
/// ------
/// - `initial_tdee`: seed TDEE override in kcal/day; `<= 0` seeds from the
///   first observation's calories.
/// - `fat_energy_density`: kcal per kg of body-mass change.
/// - `tdee_rsd`: TDEE random-walk noise per day, relative to calories.
/// - `calorie_rsd`: calorie-report error, relative to reported calories.
/// - `weight_obs_rsd`: scale error, relative to the reading.
/// - `weight_drift_rsd`: true-weight drift per step, relative to weight.
/// - `variance_boost`: scale of the residual-driven measurement inflation.
/// - `goal_weight`: target weight in kg; `<= 0` disables goal advice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct EnergyParams {
    #[cfg_attr(feature = "serde", serde(rename = "InitialTDEE"))]
    pub initial_tdee: f64,
    #[cfg_attr(feature = "serde", serde(rename = "CalPerFatKg"))]
    pub fat_energy_density: f64,
    #[cfg_attr(feature = "serde", serde(rename = "RsdTDEE"))]
    pub tdee_rsd: f64,
    #[cfg_attr(feature = "serde", serde(rename = "RsdObsCal"))]
    pub calorie_rsd: f64,
    #[cfg_attr(feature = "serde", serde(rename = "RsdObsWeight"))]
    pub weight_obs_rsd: f64,
    #[cfg_attr(feature = "serde", serde(rename = "RsdWeight"))]
    pub weight_drift_rsd: f64,
    #[cfg_attr(feature = "serde", serde(rename = "PfVarianceBoost"))]
    pub variance_boost: f64,
    #[cfg_attr(feature = "serde", serde(rename = "GoalWeight"))]
    pub goal_weight: f64,
}

impl Default for EnergyParams {
    fn default() -> Self {
        EnergyParams {
            initial_tdee: -1.0,
            fat_energy_density: 7700.0,
            tdee_rsd: 0.01,
            calorie_rsd: 0.1,
            weight_obs_rsd: 0.004,
            weight_drift_rsd: 0.0001,
            variance_boost: 1.0 / 6.0,
            goal_weight: -1.0,
        }
    }
}

impl EnergyParams {
    /// Check the coefficients for sanity before they are saved.
    ///
    /// Errors
    /// ------
    /// - `ParamError::InvalidFatEnergyDensity` unless finite and > 0.
    /// - `ParamError::InvalidNoiseCoefficient` for a NaN/±inf or negative
    ///   noise coefficient (first offender in theta order).
    /// - `ParamError::InvalidInitialTdee` / `InvalidGoalWeight` for NaN/±inf.
    pub fn validate(&self) -> ParamResult<()> {
        if !self.fat_energy_density.is_finite() || self.fat_energy_density <= 0.0 {
            return Err(ParamError::InvalidFatEnergyDensity { value: self.fat_energy_density });
        }
        for (name, value) in CALIBRATED_NAMES.into_iter().zip(self.noise_coefficients()) {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamError::InvalidNoiseCoefficient { name, value });
            }
        }
        if !self.initial_tdee.is_finite() {
            return Err(ParamError::InvalidInitialTdee { value: self.initial_tdee });
        }
        if !self.goal_weight.is_finite() {
            return Err(ParamError::InvalidGoalWeight { value: self.goal_weight });
        }
        Ok(())
    }

    /// TDEE the replay starts from, given the first observation's calories.
    pub fn seed_tdee(&self, first_calories: f64) -> f64 {
        if self.initial_tdee > 0.0 { self.initial_tdee } else { first_calories }
    }

    /// Noise coefficients in theta order.
    pub fn noise_coefficients(&self) -> [f64; CALIBRATED_DIM] {
        [
            self.tdee_rsd,
            self.calorie_rsd,
            self.weight_obs_rsd,
            self.weight_drift_rsd,
            self.variance_boost,
        ]
    }

    /// Map the noise coefficients into unconstrained space (`softplus⁻¹`).
    ///
    /// Errors
    /// ------
    /// - `ParamError::NonPositiveCalibrationStart` if a coefficient is not
    ///   finite and > 0; softplus cannot reach zero.
    pub fn to_theta(&self) -> ParamResult<Array1<f64>> {
        let mut theta = Array1::zeros(CALIBRATED_DIM);
        for (i, (name, value)) in
            CALIBRATED_NAMES.into_iter().zip(self.noise_coefficients()).enumerate()
        {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParamError::NonPositiveCalibrationStart { name, value });
            }
            theta[i] = safe_softplus_inv(value);
        }
        Ok(theta)
    }

    /// Copy of `self` with the noise coefficients replaced by `softplus(theta)`.
    ///
    /// Seed TDEE, fat energy density and goal weight are carried over.
    ///
    /// Errors
    /// ------
    /// - `ParamError::ThetaLengthMismatch` unless `theta.len() == CALIBRATED_DIM`.
    /// - `ParamError::InvalidThetaInput` for a non-finite entry.
    pub fn with_theta(&self, theta: ArrayView1<f64>) -> ParamResult<EnergyParams> {
        validate_theta(theta, CALIBRATED_DIM)?;
        Ok(EnergyParams {
            tdee_rsd: safe_softplus(theta[0]),
            calorie_rsd: safe_softplus(theta[1]),
            weight_obs_rsd: safe_softplus(theta[2]),
            weight_drift_rsd: safe_softplus(theta[3]),
            variance_boost: safe_softplus(theta[4]),
            ..*self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Defaults and the `seed_tdee` sentinel.
    // - `validate` failure ordering.
    // - theta mapping: start-point guard, length/finite checks, recovery of
    //   the original coefficients.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // An unset seed TDEE falls back to the first observation's calories.
    //
    // Given
    // -----
    // - Default params (initial_tdee = -1).
    // - A copy with initial_tdee = 2600.
    //
    // Expect
    // ------
    // - Default seeds from calories; override wins otherwise.
    fn unset_seed_tdee_falls_back_to_calories() {
        // Arrange
        let defaults = EnergyParams::default();
        let custom = EnergyParams { initial_tdee: 2600.0, ..defaults };

        // Act / Assert
        assert_relative_eq!(defaults.seed_tdee(1800.0), 1800.0);
        assert_relative_eq!(custom.seed_tdee(1800.0), 2600.0);
        assert!(defaults.validate().is_ok());
        assert!(custom.validate().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `validate` reports the fat energy density first, then the first bad
    // noise coefficient by name.
    //
    // Given
    // -----
    // - Params with zero fat density; params with a negative calorie_rsd.
    //
    // Expect
    // ------
    // - `InvalidFatEnergyDensity` then `InvalidNoiseCoefficient("calorie_rsd")`.
    fn validate_reports_first_offender() {
        // Arrange
        let bad_density = EnergyParams { fat_energy_density: 0.0, ..EnergyParams::default() };
        let bad_noise = EnergyParams { calorie_rsd: -0.1, ..EnergyParams::default() };

        // Act / Assert
        assert_eq!(
            bad_density.validate(),
            Err(ParamError::InvalidFatEnergyDensity { value: 0.0 })
        );
        assert_eq!(
            bad_noise.validate(),
            Err(ParamError::InvalidNoiseCoefficient { name: "calorie_rsd", value: -0.1 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Mapping the defaults to theta and back restores the coefficients and
    // leaves the non-calibrated fields alone.
    //
    // Given
    // -----
    // - Params with a seed TDEE and goal set.
    //
    // Expect
    // ------
    // - Coefficients equal to within 1e-12 relative; seed and goal unchanged.
    fn theta_mapping_restores_coefficients() {
        // Arrange
        let params =
            EnergyParams { initial_tdee: 2400.0, goal_weight: 70.0, ..EnergyParams::default() };

        // Act
        let theta = params.to_theta().expect("defaults are strictly positive");
        let mapped = params.with_theta(theta.view()).expect("theta is finite");

        // Assert
        for (a, b) in mapped.noise_coefficients().iter().zip(params.noise_coefficients()) {
            assert_relative_eq!(*a, b, max_relative = 1e-12);
        }
        assert_relative_eq!(mapped.initial_tdee, 2400.0);
        assert_relative_eq!(mapped.goal_weight, 70.0);
    }

    #[test]
    // Purpose
    // -------
    // Theta mapping rejects zero start values, wrong lengths and NaNs.
    //
    // Given
    // -----
    // - variance_boost = 0; a length-2 theta; a theta containing NaN.
    //
    // Expect
    // ------
    // - The matching `ParamError` in each case.
    fn theta_mapping_rejects_bad_inputs() {
        // Arrange
        let params = EnergyParams { variance_boost: 0.0, ..EnergyParams::default() };
        let short = array![0.1, 0.2];
        let nan = array![0.1, f64::NAN, 0.1, 0.1, 0.1];

        // Act / Assert
        assert_eq!(
            params.to_theta(),
            Err(ParamError::NonPositiveCalibrationStart { name: "variance_boost", value: 0.0 })
        );
        assert_eq!(
            params.with_theta(short.view()),
            Err(ParamError::ThetaLengthMismatch { expected: 5, actual: 2 })
        );
        assert!(matches!(
            params.with_theta(nan.view()),
            Err(ParamError::InvalidThetaInput { index: 1, .. })
        ));
    }
}
