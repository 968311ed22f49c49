//! loglik_optimizer::types: numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Name the vector, scalar and solver types shared by the optimizer so the
//! rest of the layer does not spell out `ndarray` or argmin generics.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` have length equal to the number of free
//!   coefficients (five for energy-model calibration).
//! - `Cost` is the negated log-likelihood; the adapter performs the flip.
//! - The line-search aliases assume argmin's `(Param, Gradient, Float)`
//!   forms as of the pinned argmin version.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Unconstrained parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient vector, same shape as [`Theta`].
pub type Grad = Array1<f64>;

/// Scalar objective `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters reported by the solver
/// (e.g. `"cost_count"`, `"gradient_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
