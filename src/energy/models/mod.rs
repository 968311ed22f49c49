//! models: user-facing energy model.
//!
//! [`EnergyModel`] wraps the replay engine with a parameter set, goal advice,
//! and maximum-likelihood calibration of the noise coefficients through the
//! crate's optimizer. Front-ends (Python bindings, services) should depend on
//! this type rather than on `energy::core` directly.

pub mod tracker;

pub use self::tracker::EnergyModel;

pub mod prelude {
    pub use super::tracker::EnergyModel;
}
