//! Python conversion helpers for the `python-bindings` feature.
//!
//! Everything here turns loosely typed Python input (lists, numpy arrays,
//! pandas Series, `datetime.date` or ISO strings) into the crate's validated
//! types, and turns estimates back into dicts of numpy arrays.
#[cfg(feature = "python-bindings")]
use chrono::NaiveDate;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
use crate::{
    energy::{
        core::{
            data::{Observation, ObservationLog},
            estimate::Estimate,
            options::{EnergyOptions, FilterOptions, UpdateStrategy},
            params::EnergyParams,
        },
        goal::GoalAdvice,
        models::tracker::EnergyModel,
    },
    optimization::loglik_optimizer::traits::{LineSearcher, MLEOptions, Tolerances},
};

/// Borrow a contiguous 1-D float64 view of `raw_data`, copying only when the
/// input is not already a contiguous numpy array.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Dates from a sequence of `datetime.date`, a numpy `datetime64[D]` array,
/// or ISO `YYYY-MM-DD` strings.
#[cfg(feature = "python-bindings")]
pub fn extract_dates(raw: &Bound<'_, PyAny>) -> PyResult<Vec<NaiveDate>> {
    if let Ok(dates) = raw.extract::<Vec<NaiveDate>>() {
        return Ok(dates);
    }
    if let Ok(listed) = raw.call_method0("tolist") {
        if let Ok(dates) = listed.extract::<Vec<NaiveDate>>() {
            return Ok(dates);
        }
    }
    let strings: Vec<String> = raw.extract().map_err(|_| {
        PyTypeError::new_err("dates must be datetime.date values, datetime64[D], or ISO strings")
    })?;
    strings
        .iter()
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
                PyValueError::new_err(format!("invalid date {s:?}: {e} (expected YYYY-MM-DD)"))
            })
        })
        .collect()
}

/// Zip three columns into a validated, date-sorted log. A later row for a
/// date replaces an earlier one.
#[cfg(feature = "python-bindings")]
pub fn extract_observation_log<'py>(
    py: Python<'py>, dates: &Bound<'py, PyAny>, weights: &Bound<'py, PyAny>,
    calories: &Bound<'py, PyAny>,
) -> PyResult<ObservationLog> {
    let dates = extract_dates(dates)?;
    let weights = extract_f64_array(py, weights)?;
    let calories = extract_f64_array(py, calories)?;
    let weights = weights.as_slice()?;
    let calories = calories.as_slice()?;
    if dates.len() != weights.len() || dates.len() != calories.len() {
        return Err(PyValueError::new_err(format!(
            "column lengths differ: {} dates, {} weights, {} calories",
            dates.len(),
            weights.len(),
            calories.len()
        )));
    }
    let entries = dates
        .into_iter()
        .zip(weights.iter().zip(calories))
        .map(|(date, (&weight, &kcal))| Observation::new(date, weight, kcal))
        .collect();
    Ok(ObservationLog::from_unsorted(entries)?)
}

/// Overrides for [`EnergyParams`]; `None` keeps the default.
#[cfg(feature = "python-bindings")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ParamOverrides {
    pub initial_tdee: Option<f64>,
    pub fat_energy_density: Option<f64>,
    pub tdee_rsd: Option<f64>,
    pub calorie_rsd: Option<f64>,
    pub weight_obs_rsd: Option<f64>,
    pub weight_drift_rsd: Option<f64>,
    pub variance_boost: Option<f64>,
    pub goal_weight: Option<f64>,
}

#[cfg(feature = "python-bindings")]
impl ParamOverrides {
    fn resolve(self) -> PyResult<EnergyParams> {
        let d = EnergyParams::default();
        let params = EnergyParams {
            initial_tdee: self.initial_tdee.unwrap_or(d.initial_tdee),
            fat_energy_density: self.fat_energy_density.unwrap_or(d.fat_energy_density),
            tdee_rsd: self.tdee_rsd.unwrap_or(d.tdee_rsd),
            calorie_rsd: self.calorie_rsd.unwrap_or(d.calorie_rsd),
            weight_obs_rsd: self.weight_obs_rsd.unwrap_or(d.weight_obs_rsd),
            weight_drift_rsd: self.weight_drift_rsd.unwrap_or(d.weight_drift_rsd),
            variance_boost: self.variance_boost.unwrap_or(d.variance_boost),
            goal_weight: self.goal_weight.unwrap_or(d.goal_weight),
        };
        params.validate()?;
        Ok(params)
    }
}

/// Filter and optimizer settings; `None` keeps the default.
#[cfg(feature = "python-bindings")]
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides<'a> {
    pub strategy: Option<&'a str>,
    pub alpha: Option<f64>,
    pub fixed_point_iters: Option<usize>,
    pub min_dt: Option<f64>,
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
    pub line_searcher: Option<&'a str>,
    pub lbfgs_mem: Option<usize>,
    pub verbose: Option<bool>,
}

#[cfg(feature = "python-bindings")]
impl OptionOverrides<'_> {
    fn resolve(&self) -> PyResult<EnergyOptions> {
        let defaults = FilterOptions::default();
        let mut strategy = match self.strategy {
            Some(name) => name.parse::<UpdateStrategy>()?,
            None => defaults.strategy,
        };
        if let (UpdateStrategy::AlphaBeta { alpha }, Some(a)) = (&mut strategy, self.alpha) {
            *alpha = a;
        }
        let filter = FilterOptions::new(
            strategy,
            self.fixed_point_iters.unwrap_or(defaults.fixed_point_iters),
            self.min_dt.unwrap_or(defaults.min_dt),
        )?;
        Ok(EnergyOptions::new(filter, self.mle_opts()?))
    }

    fn mle_opts(&self) -> PyResult<MLEOptions> {
        let defaults = MLEOptions::default();
        let tols = if self.tol_grad.is_none() && self.tol_cost.is_none() && self.max_iter.is_none()
        {
            defaults.tols
        } else {
            Tolerances::new(self.tol_grad, self.tol_cost, self.max_iter)?
        };
        let ls = match self.line_searcher {
            Some(name) => name.parse::<LineSearcher>()?,
            None => defaults.line_searcher,
        };
        Ok(MLEOptions::new(tols, ls, self.verbose.unwrap_or(false), self.lbfgs_mem)?)
    }
}

/// Build a model from keyword overrides. `alpha` only applies together with
/// `strategy="alpha-beta"`.
#[cfg(feature = "python-bindings")]
pub fn build_energy_model(
    params: ParamOverrides, options: &OptionOverrides<'_>,
) -> PyResult<EnergyModel> {
    Ok(EnergyModel::new(params.resolve()?, options.resolve()?))
}

/// `{"date": [...], "weight": ndarray, "tdee": ndarray, "sd_weight": ndarray,
/// "sd_tdee": ndarray}`.
#[cfg(feature = "python-bindings")]
pub fn estimates_to_dict<'py>(
    py: Python<'py>, estimates: &[Estimate],
) -> PyResult<Bound<'py, PyDict>> {
    let column = |f: fn(&Estimate) -> f64| estimates.iter().map(f).collect::<Vec<f64>>();
    let out = PyDict::new(py);
    out.set_item("date", estimates.iter().map(|e| e.date).collect::<Vec<NaiveDate>>())?;
    out.set_item("weight", column(|e| e.weight).into_pyarray(py))?;
    out.set_item("tdee", column(|e| e.tdee).into_pyarray(py))?;
    out.set_item("sd_weight", column(|e| e.sd_weight).into_pyarray(py))?;
    out.set_item("sd_tdee", column(|e| e.sd_tdee).into_pyarray(py))?;
    Ok(out)
}

#[cfg(feature = "python-bindings")]
pub fn advice_to_dict<'py>(py: Python<'py>, advice: &GoalAdvice) -> PyResult<Bound<'py, PyDict>> {
    let out = PyDict::new(py);
    out.set_item("calories", advice.calories)?;
    out.set_item("delta", advice.delta)?;
    out.set_item("weekly_rate", advice.weekly_rate)?;
    out.set_item("direction", advice.direction.map(|d| d.to_string()))?;
    out.set_item("message", advice.message.as_str())?;
    Ok(out)
}

#[cfg(feature = "python-bindings")]
pub fn params_to_dict<'py>(py: Python<'py>, params: &EnergyParams) -> PyResult<Bound<'py, PyDict>> {
    let out = PyDict::new(py);
    out.set_item("initial_tdee", params.initial_tdee)?;
    out.set_item("fat_energy_density", params.fat_energy_density)?;
    out.set_item("tdee_rsd", params.tdee_rsd)?;
    out.set_item("calorie_rsd", params.calorie_rsd)?;
    out.set_item("weight_obs_rsd", params.weight_obs_rsd)?;
    out.set_item("weight_drift_rsd", params.weight_drift_rsd)?;
    out.set_item("variance_boost", params.variance_boost)?;
    out.set_item("goal_weight", params.goal_weight)?;
    Ok(out)
}
