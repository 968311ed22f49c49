//! numerical_stability: guarded transforms between optimizer and model space.
//!
//! Purpose
//! -------
//! Keep the softplus pair used by calibration in one place so parameter
//! mapping (`EnergyParams::to_theta` / `with_theta`) shares one cutoff.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; positivity of softplus⁻¹ arguments is checked by the
//!   caller (`ParamError::NonPositiveCalibrationStart`).
//! - Pure functions: no logging, I/O or global state.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{SOFTPLUS_CUTOFF, safe_softplus, safe_softplus_inv};

pub mod prelude {
    pub use super::transformations::{safe_softplus, safe_softplus_inv};
}
