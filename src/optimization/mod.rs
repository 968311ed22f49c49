//! optimization: argmin-backed likelihood maximization for calibration.
//!
//! Purpose
//! -------
//! Tune the estimator's noise coefficients by maximizing the Gaussian
//! log-likelihood of its innovation sequence. The model side implements
//! `LogLikelihood`; this layer supplies the solver, the softplus transforms
//! that keep coefficients positive, and a single error surface.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer::maximize` runs L-BFGS (Hager–Zhang or More–Thuente
//!   line search) on `c(θ) = -ℓ(θ)`, with finite-difference gradients when
//!   the model provides none.
//! - `numerical_stability` maps between unconstrained θ and positive
//!   coefficients.
//! - `errors::OptError` normalizes configuration mistakes, argmin failures
//!   and estimator errors raised during likelihood evaluation.
//!
//! Conventions
//! -----------
//! - Outcomes are reported in log-likelihood terms (`ℓ(θ̂)`), never as cost.
//! - Progress logging is opt-in: the `obs_slog` feature plus
//!   `MLEOptions::verbose`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the adapter sign convention, solver construction,
//!   option validation and error conversions. End-to-end calibration is
//!   exercised by the energy model tests and `tests/`.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use tdee_estimator::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
