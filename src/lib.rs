//! tdee_estimator: recursive body-weight and TDEE estimation with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the estimator to Python through the `_tdee_estimator` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules: [`energy`] (observations, filter, goal
//!   advice, calibrated model) and [`optimization`] (the L-BFGS likelihood
//!   maximizer and numerical helpers).
//! - With `python-bindings`, define `TdeeEstimator`, `CalibrationOutcome`
//!   and the `goal_advice` function, and register them under
//!   `tdee_estimator.energy`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Numerical work lives in the inner modules; this file only converts
//!   inputs, dispatches, and maps errors to Python exceptions.
//! - Python columns are normalized into an [`energy::ObservationLog`]
//!   (sorted, one row per date, finite, weight > 0, calories >= 0) before
//!   any replay.
//!
//! Conventions
//! -----------
//! - Dates cross the boundary as `datetime.date`; estimates come back as a
//!   dict of numpy arrays keyed `date`, `weight`, `tdee`, `sd_weight`,
//!   `sd_tdee`.
//! - Every crate error surfaces as `ValueError` carrying its `Display`
//!   message, including optimizer failures.
//!
//! Downstream usage
//! ----------------
//! - Rust code should use [`energy::EnergyModel`] directly and ignore the
//!   items behind `python-bindings`.
//! - The Python package imports `_tdee_estimator` and re-exports
//!   `tdee_estimator.energy.TdeeEstimator`.
//!
//! Testing notes
//! -------------
//! - Behavior is covered by unit tests in the inner modules and by the
//!   scenario tests under `tests/`; the bindings are thin enough that only
//!   Python smoke tests exercise them.

pub mod energy;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use crate::{
    energy::{errors::EnergyError, goal::goal_advice, models::tracker::EnergyModel},
    optimization::loglik_optimizer::traits::OptimOutcome,
    utils::{
        OptionOverrides, ParamOverrides, advice_to_dict, build_energy_model, estimates_to_dict,
        extract_observation_log, params_to_dict,
    },
};

/// TdeeEstimator: Python-facing wrapper for [`EnergyModel`].
///
/// Constructed as `TdeeEstimator(**overrides)`; every keyword is optional
/// and falls back to the Rust default:
/// - model: `initial_tdee`, `fat_energy_density`, `tdee_rsd`, `calorie_rsd`,
///   `weight_obs_rsd`, `weight_drift_rsd`, `variance_boost`, `goal_weight`.
/// - filter: `strategy` (`"covariance"` or `"alpha-beta"`), `alpha`,
///   `fixed_point_iters`, `min_dt`.
/// - calibration: `tol_grad`, `tol_cost`, `max_iter`, `line_searcher`,
///   `lbfgs_mem`, `verbose`.
///
/// Every method that takes data accepts three equal-length columns: dates,
/// weights (kg) and calories (kcal). Rows may arrive unsorted; a repeated
/// date keeps its last row.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "tdee_estimator.energy")]
pub struct TdeeEstimator {
    pub inner: EnergyModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl TdeeEstimator {
    #[new]
    #[pyo3(
        signature = (
            *,
            initial_tdee = None,
            fat_energy_density = None,
            tdee_rsd = None,
            calorie_rsd = None,
            weight_obs_rsd = None,
            weight_drift_rsd = None,
            variance_boost = None,
            goal_weight = None,
            strategy = None,
            alpha = None,
            fixed_point_iters = None,
            min_dt = None,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            verbose = None,
        ),
        text_signature = "(*, initial_tdee=-1.0, fat_energy_density=7700.0, tdee_rsd=0.01, \
                          calorie_rsd=0.1, weight_obs_rsd=0.004, weight_drift_rsd=0.0001, \
                          variance_boost=1/6, goal_weight=-1.0, strategy='covariance', \
                          alpha=None, fixed_point_iters=25, min_dt=0.01, tol_grad=None, \
                          tol_cost=None, max_iter=None, line_searcher='MoreThuente', \
                          lbfgs_mem=None, verbose=False)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        initial_tdee: Option<f64>, fat_energy_density: Option<f64>, tdee_rsd: Option<f64>,
        calorie_rsd: Option<f64>, weight_obs_rsd: Option<f64>, weight_drift_rsd: Option<f64>,
        variance_boost: Option<f64>, goal_weight: Option<f64>, strategy: Option<&str>,
        alpha: Option<f64>, fixed_point_iters: Option<usize>, min_dt: Option<f64>,
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: Option<bool>,
    ) -> PyResult<Self> {
        let params = ParamOverrides {
            initial_tdee,
            fat_energy_density,
            tdee_rsd,
            calorie_rsd,
            weight_obs_rsd,
            weight_drift_rsd,
            variance_boost,
            goal_weight,
        };
        let options = OptionOverrides {
            strategy,
            alpha,
            fixed_point_iters,
            min_dt,
            tol_grad,
            tol_cost,
            max_iter,
            line_searcher,
            lbfgs_mem,
            verbose,
        };
        Ok(TdeeEstimator { inner: build_energy_model(params, &options)? })
    }

    /// One estimate per (deduplicated) row, as a dict of numpy arrays.
    #[pyo3(text_signature = "(self, dates, weights, calories, /)")]
    pub fn estimate<'py>(
        &self, py: Python<'py>, dates: &Bound<'py, PyAny>, weights: &Bound<'py, PyAny>,
        calories: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let log = extract_observation_log(py, dates, weights, calories)?;
        estimates_to_dict(py, &self.inner.estimate(log.entries()))
    }

    /// Goal advice from the latest estimate, or `None` for empty input.
    #[pyo3(text_signature = "(self, dates, weights, calories, /)")]
    pub fn advise<'py>(
        &self, py: Python<'py>, dates: &Bound<'py, PyAny>, weights: &Bound<'py, PyAny>,
        calories: &Bound<'py, PyAny>,
    ) -> PyResult<Option<Bound<'py, PyDict>>> {
        let log = extract_observation_log(py, dates, weights, calories)?;
        self.inner.advise(log.entries()).map(|advice| advice_to_dict(py, &advice)).transpose()
    }

    /// Fit the noise coefficients by maximum likelihood. Later estimates use
    /// the calibrated values.
    #[pyo3(text_signature = "(self, dates, weights, calories, /)")]
    pub fn calibrate<'py>(
        &mut self, py: Python<'py>, dates: &Bound<'py, PyAny>, weights: &Bound<'py, PyAny>,
        calories: &Bound<'py, PyAny>,
    ) -> PyResult<()> {
        let log = extract_observation_log(py, dates, weights, calories)?;
        self.inner.calibrate(&log)?;
        Ok(())
    }

    #[getter]
    pub fn params<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        params_to_dict(py, self.inner.active_params())
    }

    #[getter]
    pub fn calibrated_params<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        params_to_dict(py, self.inner.calibrated()?)
    }

    #[getter]
    pub fn results(&self) -> PyResult<CalibrationOutcome> {
        match &self.inner.results {
            Some(outcome) => Ok(CalibrationOutcome { inner: outcome.clone() }),
            None => Err(EnergyError::NotCalibrated.into()),
        }
    }

    #[getter]
    pub fn strategy(&self) -> &'static str {
        self.inner.options.filter.strategy.label()
    }
}

/// CalibrationOutcome: read-only view of the optimizer result.
///
/// `theta_hat` is in softplus⁻¹ space; `TdeeEstimator.calibrated_params`
/// holds the mapped coefficients. `value` is the maximized log-likelihood.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "tdee_estimator.energy")]
pub struct CalibrationOutcome {
    pub inner: OptimOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl CalibrationOutcome {
    #[getter]
    pub fn theta_hat(&self) -> Vec<f64> {
        self.inner.theta_hat.to_vec()
    }

    #[getter]
    pub fn value(&self) -> f64 {
        self.inner.value
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.clone()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[getter]
    pub fn grad_norm(&self) -> Option<f64> {
        self.inner.grad_norm
    }

    #[getter]
    pub fn fn_evals(&self) -> Vec<(String, u64)> {
        self.inner.fn_evals.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }
}

/// Stateless intake recommendation for a current weight, goal and TDEE.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "goal_advice")]
#[pyo3(
    signature = (current_weight, goal_weight, tdee, fat_energy_density = 7700.0),
    text_signature = "(current_weight, goal_weight, tdee, fat_energy_density=7700.0)"
)]
fn py_goal_advice<'py>(
    py: Python<'py>, current_weight: f64, goal_weight: f64, tdee: f64, fat_energy_density: f64,
) -> PyResult<Bound<'py, PyDict>> {
    advice_to_dict(py, &goal_advice(current_weight, goal_weight, tdee, fat_energy_density))
}

/// `_tdee_estimator`: module initializer.
///
/// Creates the `energy` submodule, attaches it to the extension module and
/// registers it in `sys.modules` as `tdee_estimator.energy` so dotted
/// imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _tdee_estimator<'py>(py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let energy_mod = PyModule::new(py, "energy")?;
    energy_module(m, &energy_mod)?;

    py.import("sys")?.getattr("modules")?.set_item("tdee_estimator.energy", energy_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn energy_module<'py>(parent: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<TdeeEstimator>()?;
    m.add_class::<CalibrationOutcome>()?;
    m.add_function(wrap_pyfunction!(py_goal_advice, m)?)?;
    parent.add_submodule(m)?;
    Ok(())
}
