//! Shared checks for calibration inputs.
//!
//! These run once per optimizer call (`LogLikelihood::check`) or once per
//! likelihood evaluation (theta mapping), never inside the replay loop.
use crate::energy::{
    core::{data::ObservationLog, options::UpdateStrategy},
    errors::{EnergyError, EnergyResult, ParamError, ParamResult},
};
use ndarray::ArrayView1;

/// Require `theta.len() == dim` and finite entries.
///
/// Errors
/// ------
/// - `ParamError::ThetaLengthMismatch`
/// - `ParamError::InvalidThetaInput` for the first non-finite entry.
pub fn validate_theta(theta: ArrayView1<f64>, dim: usize) -> ParamResult<()> {
    if theta.len() != dim {
        return Err(ParamError::ThetaLengthMismatch { expected: dim, actual: theta.len() });
    }
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(ParamError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

/// Require a strategy with an innovation likelihood and at least two
/// observations to score.
///
/// Errors
/// ------
/// - `EnergyError::CalibrationUnsupported` for alpha-beta.
/// - `EnergyError::InsufficientObservations` for fewer than two entries.
pub fn validate_calibration_input(
    log: &ObservationLog, strategy: &UpdateStrategy,
) -> EnergyResult<()> {
    if let UpdateStrategy::AlphaBeta { .. } = strategy {
        return Err(EnergyError::CalibrationUnsupported { strategy: strategy.label() });
    }
    if log.len() < 2 {
        return Err(EnergyError::InsufficientObservations { needed: 2, found: log.len() });
    }
    Ok(())
}
