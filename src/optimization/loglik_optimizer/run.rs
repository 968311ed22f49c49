//! Execution helper that runs an argmin solver on a log-likelihood problem and
//! returns a crate-friendly [`OptimOutcome`].
//!
//! With the `obs_slog` feature and `opts.verbose`, the run is logged to the
//! terminal through slog: one record for the starting point, one per
//! iteration from argmin's slog observer, and one for the outcome.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;
#[cfg(feature = "obs_slog")]
use slog::{Drain, Logger, info, o};

/// Run an argmin solver from `theta0` and normalize the result.
///
/// Parameters
/// ----------
/// - `theta0`: starting point, moved into the executor state.
/// - `opts`: `max_iter` is applied here; tolerances were applied by the
///   solver builder.
/// - `problem`: the model/data adapter.
/// - `solver`: an L-BFGS instance from `builders`.
///
/// Returns
/// -------
/// [`OptimOutcome`] with the best θ, `ℓ(θ̂)` (sign restored), termination
/// status, iteration and evaluation counts, and the last gradient norm.
///
/// Errors
/// ------
/// - argmin runtime failures (line search, model errors raised by the cost
///   or gradient) via `From<argmin::core::Error>`.
/// - Outcome validation errors (missing or non-finite θ̂, non-finite value).
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    #[cfg(feature = "obs_slog")]
    let logger = opts.verbose.then(terminal_logger);
    #[cfg(feature = "obs_slog")]
    if let Some(logger) = &logger {
        log_initial_state(logger, &theta0, &problem)?;
    }

    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    let outcome = OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )?;

    #[cfg(feature = "obs_slog")]
    if let Some(logger) = &logger {
        info!(logger, "calibration finished";
            "loglik" => outcome.value,
            "iterations" => outcome.iterations,
            "status" => outcome.status.as_str());
    }
    Ok(outcome)
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn terminal_logger() -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, o!("component" => "calibration"))
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(
    logger: &Logger, theta0: &Theta, problem: &ArgMinAdapter<'_, F>,
) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    match problem.gradient(theta0) {
        Ok(g) => info!(logger, "initial state"; "loglik" => ll0, "grad_norm" => g.l2_norm()),
        Err(_) => info!(logger, "initial state"; "loglik" => ll0),
    }
    Ok(())
}
