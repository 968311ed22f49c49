//! loglik_optimizer: argmin-powered log-likelihood maximizer.
//!
//! Purpose
//! -------
//! Let a model expose `ℓ(θ)` through [`LogLikelihood`] and get back the
//! maximizing θ from [`maximize`], without touching argmin types.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] presents `c(θ) = -ℓ(θ)` to argmin and
//!   supplies central/forward finite-difference gradients when the model
//!   has no analytic one.
//! - [`builders`] constructs L-BFGS for the chosen [`traits::LineSearcher`];
//!   [`run::run_lbfgs`] executes it and normalizes the result into an
//!   [`OptimOutcome`].
//! - [`validation`] holds the shared finiteness and tolerance checks.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`LogLikelihood::value`] reports invalid θ as an `OptError`, never a
//!   panic; a non-finite value is turned into `OptError::NonFiniteCost`.
//! - θ lives in unconstrained space; mapping to positive coefficients
//!   happens in the model.
//!
//! Testing notes
//! -------------
//! - Unit tests cover sign conventions and error capture in [`adapter`],
//!   solver wiring in [`builders`], and option/outcome validation in
//!   [`traits`].

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use tdee_estimator::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
