//! High-level entry point for maximizing a [`LogLikelihood`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` with L-BFGS, starting from `theta0`.
///
/// Calls `f.check(theta0, data)` once, wraps `(f, data)` so argmin minimizes
/// `-ℓ(θ)`, builds the solver for `opts.line_searcher` and runs it.
///
/// Errors
/// ------
/// - Whatever `f.check` rejects.
/// - Invalid tolerances from the solver builder.
/// - Runtime failures from [`run_lbfgs`].
///
/// Example
/// -------
/// ```
/// use ndarray::array;
/// use tdee_estimator::optimization::{
///     errors::OptResult,
///     loglik_optimizer::{LogLikelihood, MLEOptions, Theta, maximize},
/// };
///
/// struct Peak;
/// impl LogLikelihood for Peak {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-(theta[0] - 2.0).powi(2))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Peak, array![0.0], &(), &MLEOptions::default())?;
/// assert!((out.theta_hat[0] - 2.0).abs() < 1e-3);
/// # Ok::<(), tdee_estimator::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
