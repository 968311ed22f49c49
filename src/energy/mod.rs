//! energy: body-weight and TDEE estimation from daily weigh-ins and intake.
//!
//! Purpose
//! -------
//! Estimate true body weight and total daily energy expenditure (TDEE) from
//! noisy scale readings and self-reported calories, using the energy-balance
//! relation `Δweight = (calories − TDEE)/density` inside a two-state
//! recursive filter, and turn the latest estimate into intake advice.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the data types, parameters, and the filter itself
//!   (predict, robust update, fixed-gain alternative, replay driver).
//! - [`models`] exposes [`EnergyModel`], which adds calibration of the noise
//!   coefficients by maximum likelihood.
//! - [`goal`] converts an estimate and a goal weight into a recommendation.
//! - [`errors`] defines [`EnergyError`] and [`ParamError`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Every estimation call replays the full log from its first entry; the
//!   output has exactly one estimate per observation, in input order.
//! - Replay is deterministic and infallible. Inputs are validated only by
//!   the optional containers ([`ObservationLog`], [`EnergyParams::validate`]).
//! - A reading far from the prediction inflates its own measurement
//!   variance, so a single mis-entered weight moves the estimates only
//!   slightly.
//!
//! Conventions
//! -----------
//! - kg, kcal, kcal/day and fractional days throughout.
//! - Calories on an observation are attributed to the interval that starts
//!   at that observation.
//!
//! Downstream usage
//! ----------------
//! 1. Build an [`ObservationLog`] (or keep a sorted `Vec<Observation>`).
//! 2. Create an [`EnergyModel`] from [`EnergyParams`] and [`EnergyOptions`].
//! 3. Call `estimate` / `latest` / `advise`; optionally `calibrate` first.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each step in [`core`], the advisory in
//!   [`goal`], and the facade in [`models`].
//! - Integration tests under `tests/` cover closed-loop convergence,
//!   outlier damping, duplicate dates, strategy switching, and calibration.

pub mod core;
pub mod errors;
pub mod goal;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    EnergyOptions, EnergyParams, Estimate, FilterOptions, Observation, ObservationLog,
    UpdateStrategy,
};
pub use self::errors::{EnergyError, EnergyResult, ParamError, ParamResult};
pub use self::goal::{Direction, GoalAdvice, goal_advice};
pub use self::models::EnergyModel;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use tdee_estimator::energy::prelude::*;
//
// to import the main estimator surface in a single line.

pub mod prelude {
    pub use super::{
        Direction, EnergyError, EnergyModel, EnergyOptions, EnergyParams, EnergyResult, Estimate,
        FilterOptions, GoalAdvice, Observation, ObservationLog, ParamError, ParamResult,
        UpdateStrategy, goal_advice,
    };
}
