//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: implemented by models that can score a θ vector
//!   (the energy model scores its innovation sequence).
//! - [`MLEOptions`] and [`Tolerances`]: optimizer configuration.
//! - [`LineSearcher`]: line search used by L-BFGS.
//! - [`OptimOutcome`]: normalized result returned by `maximize`.
//!
//! Convention: we *maximize* `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`. An analytic
//! gradient, when provided, is `∇ℓ(θ)`; the adapter flips the sign.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// Model-side interface to the optimizer.
///
/// - `value` evaluates `ℓ(θ)` on `data`.
/// - `check` rejects an unusable `(θ, data)` pair once, before the run.
/// - `grad` is optional; without it the adapter falls back to finite
///   differences of the cost.
pub trait LogLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search used inside L-BFGS. Parses case-insensitively from
/// `"MoreThuente"` / `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields
/// ------
/// - `tols`: stopping rules.
/// - `line_searcher`: line search used by L-BFGS.
/// - `verbose`: with the `obs_slog` feature, log the starting point and
///   every iteration to the terminal.
/// - `lbfgs_mem`: L-BFGS history size; `None` uses [`DEFAULT_LBFGS_MEM`].
///
/// The default stops at `‖∇‖ < 1e-6` or 300 iterations with More–Thuente.
///
/// [`DEFAULT_LBFGS_MEM`]: crate::optimization::loglik_optimizer::DEFAULT_LBFGS_MEM
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Errors
    /// ------
    /// - `OptError::InvalidLBFGSMem` when `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(300) },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules. Any field may be `None`, but not all three.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// Errors
    /// ------
    /// - `OptError::NoTolerancesProvided` if all three are `None`.
    /// - `OptError::InvalidTolGrad` / `OptError::InvalidTolCost` for
    ///   non-finite or non-positive tolerances.
    /// - `OptError::InvalidMaxIter` if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Result of `maximize`.
///
/// - `value` is the best log-likelihood `ℓ(θ̂)`, not the cost.
/// - `converged` is `true` for any terminating status other than
///   `NotTerminated`; `status` carries argmin's wording.
/// - `fn_evals` uses argmin's counter names (`cost_count`, ...).
/// - `grad_norm` is the norm of the last gradient, when one was kept.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated outcome from raw solver state.
    ///
    /// Errors
    /// ------
    /// - `OptError::MissingThetaHat` / `OptError::InvalidThetaHat` when the
    ///   best parameter is absent or non-finite.
    /// - `OptError::NonFiniteCost` when `value` is not finite.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, converged: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match converged {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            other => (true, format!("{other:?}")),
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmin::core::TerminationReason;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Line-search parsing.
    // - Tolerance and option validation.
    // - Outcome normalization from solver state.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Line-search names parse case-insensitively and reject unknown names.
    //
    // Given
    // -----
    // - "hagerZHANG", "MoreThuente", "backtracking".
    //
    // Expect
    // ------
    // - Two variants, then `InvalidLineSearch`.
    fn line_searcher_parses_case_insensitively() {
        assert_eq!("hagerZHANG".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        assert_eq!("MoreThuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert!(matches!(
            "backtracking".parse::<LineSearcher>(),
            Err(OptError::InvalidLineSearch { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Tolerances need at least one rule, positive values and a nonzero cap;
    // options reject an empty L-BFGS history.
    //
    // Given
    // -----
    // - All-None tolerances, a negative gradient tolerance, max_iter = 0,
    //   lbfgs_mem = 0.
    //
    // Expect
    // ------
    // - The matching `OptError` for each.
    fn tolerances_and_options_are_validated() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(Some(-1.0), None, None),
            Err(OptError::InvalidTolGrad { .. })
        ));
        assert!(matches!(
            Tolerances::new(None, None, Some(0)),
            Err(OptError::InvalidMaxIter { max_iter: 0, .. })
        ));
        let tols = Tolerances::new(None, None, Some(10)).expect("valid tolerances");
        assert!(matches!(
            MLEOptions::new(tols, LineSearcher::MoreThuente, false, Some(0)),
            Err(OptError::InvalidLBFGSMem { mem: 0, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Outcome construction maps termination status and rejects a missing
    // parameter vector.
    //
    // Given
    // -----
    // - A finite θ̂ with `SolverConverged`; a missing θ̂.
    //
    // Expect
    // ------
    // - `converged == true` and a gradient norm of 5 for grad (3, 4).
    // - `MissingThetaHat` for the second case.
    fn outcome_maps_status_and_validates_theta() {
        let out = OptimOutcome::new(
            Some(array![0.1, 0.2]),
            -12.5,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            4,
            FnEvalMap::new(),
            Some(array![3.0, 4.0]),
        )
        .expect("valid outcome");
        assert!(out.converged);
        assert_eq!(out.iterations, 4);
        assert_eq!(out.grad_norm, Some(5.0));

        let missing = OptimOutcome::new(
            None,
            0.0,
            TerminationStatus::NotTerminated,
            0,
            FnEvalMap::new(),
            None,
        );
        assert_eq!(missing, Err(OptError::MissingThetaHat));
    }
}
