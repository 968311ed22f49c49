//! core: observations, parameters, and the energy-balance filter.
//!
//! Purpose
//! -------
//! Collect the building blocks of the body-weight / TDEE estimator: the
//! observation log, the parameter and option bundles, the latent state with
//! its covariance, the predict and robust-update steps, the fixed-gain
//! alternative, and the replay driver that ties them together.
//!
//! Key behaviors
//! -------------
//! - [`ObservationLog`] keeps daily entries sorted by date with at most one
//!   entry per day; [`ObservationLog::upsert`] replaces a same-day entry.
//! - [`replay`] recomputes every estimate from scratch on each call; there is
//!   no incremental state to keep in sync with edits to the log.
//! - [`predict`] and [`robust_update`] implement the covariance form; the
//!   update inflates the measurement variance by a residual-driven boost
//!   that is resolved with a fixed number of fixed-point passes.
//! - [`alpha_beta_step`] implements the fixed-gain form selected through
//!   [`UpdateStrategy::AlphaBeta`].
//! - [`likelihood_driver`] scores a parameter set by the Gaussian
//!   log-likelihood of its innovation sequence.
//!
//! Invariants & assumptions
//! ------------------------
//! - The state is `(tdee, weight)` with a symmetric 2×2 covariance stored as
//!   its three distinct entries ([`StateCovariance`]).
//! - Weight moves by `(calories − tdee)/density` kg per day; TDEE follows a
//!   random walk.
//! - The replay functions never validate; validation lives in
//!   [`ObservationLog`], [`EnergyParams::validate`] and [`validation`].
//!
//! Conventions
//! -----------
//! - Time is measured in (fractional) days between observation dates.
//! - Weights are kg, energies kcal, TDEE and calories kcal/day.
//! - The calibrated coefficients map to an unconstrained θ of length
//!   [`CALIBRATED_DIM`] in [`CALIBRATED_NAMES`] order.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own step; long-horizon
//!   behavior (convergence, outliers, closed-loop control) is covered by the
//!   integration tests under `tests/`.

pub mod alpha_beta;
pub mod data;
pub mod estimate;
pub mod options;
pub mod params;
pub mod predict;
pub mod replay;
pub mod state;
pub mod update;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::alpha_beta::{alpha_beta_step, beta_gain};
pub use self::data::{Observation, ObservationLog, elapsed_days};
pub use self::estimate::Estimate;
pub use self::options::{
    DEFAULT_ALPHA, DEFAULT_FIXED_POINT_ITERS, DEFAULT_MIN_DT, EnergyOptions, FilterOptions,
    UpdateStrategy,
};
pub use self::params::{CALIBRATED_DIM, CALIBRATED_NAMES, EnergyParams};
pub use self::predict::{Prediction, Step, predict, process_noise};
pub use self::replay::{Innovation, likelihood_driver, replay, replay_innovations};
pub use self::state::{LatentState, StateCovariance};
pub use self::update::{Correction, robust_update};
pub use self::validation::{validate_calibration_input, validate_theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use tdee_estimator::energy::core::prelude::*;
//
// to import the main core surface in a single line.

pub mod prelude {
    pub use super::data::{Observation, ObservationLog};
    pub use super::estimate::Estimate;
    pub use super::options::{EnergyOptions, FilterOptions, UpdateStrategy};
    pub use super::params::EnergyParams;
    pub use super::replay::{Innovation, replay};
    pub use super::state::{LatentState, StateCovariance};
}
