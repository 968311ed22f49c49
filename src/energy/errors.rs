//! Errors for the energy-balance estimator (observation checks, option
//! validation, likelihood evaluation, and parameter construction).
//!
//! This module defines the model error type, [`EnergyError`], and the
//! parameter error type, [`ParamError`]. The numerical core itself never
//! returns either: replay is infallible and propagates non-finite values
//! instead. These types cover the validated entry points around it
//! (observation logs, options, calibration, parameter mapping).
//!
//! ## Conventions
//! - **Indices are 0-based** and refer to the position in the observation
//!   slice or the unconstrained parameter vector.
//! - `reason` strings are short static messages suitable for end users.
//! - With the `python-bindings` feature both types convert into a Python
//!   `ValueError`.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};
use statrs::distribution::NormalError;

/// Result alias for estimator operations that may produce [`EnergyError`].
pub type EnergyResult<T> = Result<T, EnergyError>;

/// Result alias for parameter validation and mapping paths.
pub type ParamResult<T> = Result<T, ParamError>;

/// Unified error type for the estimator surface.
#[derive(Debug, Clone, PartialEq)]
pub enum EnergyError {
    // ---- Observation validation ----
    /// An observation field is NaN/±inf.
    NonFiniteData { index: usize, field: &'static str, value: f64 },

    /// Weight readings must be strictly positive.
    NonPositiveWeight { index: usize, value: f64 },

    /// Calorie reports must be non-negative.
    NegativeCalories { index: usize, value: f64 },

    /// Dates must be strictly increasing.
    UnorderedDates { index: usize },

    // ---- Options validation ----
    /// The fixed-point pass count must be at least one.
    InvalidFixedPointIters { value: usize, reason: &'static str },

    /// The alpha-beta skip threshold must be finite and > 0.
    InvalidMinDt { value: f64, reason: &'static str },

    /// The alpha-beta weight gain must lie in (0, 1).
    InvalidAlphaGain { value: f64, reason: &'static str },

    /// Unrecognized update-strategy name.
    UnknownStrategy { name: String, reason: &'static str },

    // ---- Likelihood / calibration ----
    /// Not enough observations to form a single innovation.
    InsufficientObservations { needed: usize, found: usize },

    /// The active strategy has no innovation likelihood.
    CalibrationUnsupported { strategy: &'static str },

    /// Wrapper for statrs::distribution::NormalError::MeanInvalid
    InvalidInnovationMean,

    /// Wrapper for statrs::distribution::NormalError::StandardDeviationInvalid
    InvalidInnovationVariance,

    /// Calibrated parameters were requested before `calibrate` ran.
    NotCalibrated,
}

impl std::error::Error for EnergyError {}

impl std::fmt::Display for EnergyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Observation validation ----
            EnergyError::NonFiniteData { index, field, value } => {
                write!(f, "Observation {index} has a non-finite {field}: {value}")
            }
            EnergyError::NonPositiveWeight { index, value } => {
                write!(f, "Observation {index} has a non-positive weight: {value}")
            }
            EnergyError::NegativeCalories { index, value } => {
                write!(f, "Observation {index} has negative calories: {value}")
            }
            EnergyError::UnorderedDates { index } => {
                write!(f, "Observation {index} is not strictly after its predecessor.")
            }

            // ---- Options validation ----
            EnergyError::InvalidFixedPointIters { value, reason } => {
                write!(f, "Invalid fixed-point iteration count {value}: {reason}")
            }
            EnergyError::InvalidMinDt { value, reason } => {
                write!(f, "Invalid minimum time step {value}: {reason}")
            }
            EnergyError::InvalidAlphaGain { value, reason } => {
                write!(f, "Invalid alpha-beta gain {value}: {reason}")
            }
            EnergyError::UnknownStrategy { name, reason } => {
                write!(f, "Unknown update strategy '{name}': {reason}")
            }

            // ---- Likelihood / calibration ----
            EnergyError::InsufficientObservations { needed, found } => {
                write!(f, "At least {needed} observations are required; found {found}.")
            }
            EnergyError::CalibrationUnsupported { strategy } => {
                write!(f, "The {strategy} strategy has no innovation likelihood to calibrate.")
            }
            EnergyError::InvalidInnovationMean => {
                write!(f, "Innovation mean must be finite.")
            }
            EnergyError::InvalidInnovationVariance => {
                write!(f, "Innovation variance must be finite and > 0.")
            }
            EnergyError::NotCalibrated => {
                write!(f, "Model hasn't been calibrated yet.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<EnergyError> for PyErr {
    fn from(err: EnergyError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<NormalError> for EnergyError {
    fn from(err: NormalError) -> EnergyError {
        match err {
            NormalError::MeanInvalid => EnergyError::InvalidInnovationMean,
            NormalError::StandardDeviationInvalid => EnergyError::InvalidInnovationVariance,
            _ => EnergyError::InvalidInnovationVariance,
        }
    }
}

/// Errors raised while validating or mapping [`EnergyParams`](crate::energy::core::params::EnergyParams).
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// Fat energy density must be finite and > 0.
    InvalidFatEnergyDensity { value: f64 },

    /// Noise coefficients must be finite and >= 0.
    InvalidNoiseCoefficient { name: &'static str, value: f64 },

    /// Seed TDEE must be finite (values <= 0 disable the override).
    InvalidInitialTdee { value: f64 },

    /// Goal weight must be finite (values <= 0 disable the goal).
    InvalidGoalWeight { value: f64 },

    /// Unconstrained vector has the wrong length.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Unconstrained vector entries must be finite.
    InvalidThetaInput { index: usize, value: f64 },

    /// Calibration starts from strictly positive coefficients only.
    NonPositiveCalibrationStart { name: &'static str, value: f64 },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::InvalidFatEnergyDensity { value } => {
                write!(f, "Invalid fat energy density: {value}, must be finite and > 0")
            }
            ParamError::InvalidNoiseCoefficient { name, value } => {
                write!(f, "Invalid noise coefficient {name}: {value}, must be finite and >= 0")
            }
            ParamError::InvalidInitialTdee { value } => {
                write!(f, "Invalid initial TDEE: {value}, must be finite")
            }
            ParamError::InvalidGoalWeight { value } => {
                write!(f, "Invalid goal weight: {value}, must be finite")
            }
            ParamError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            ParamError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            ParamError::NonPositiveCalibrationStart { name, value } => {
                write!(f, "Cannot calibrate from {name} = {value}; start values must be > 0")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<ParamError> for PyErr {
    fn from(err: ParamError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
