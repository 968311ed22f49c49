//! Output record of a replay.
use chrono::NaiveDate;

/// Estimated latent weight and TDEE on one observation date.
///
/// Fields
/// ------
/// - `date`: date of the observation this estimate follows.
/// - `weight`: filtered body weight in kg.
/// - `tdee`: filtered daily energy expenditure in kcal/day.
/// - `sd_weight`, `sd_tdee`: standard deviations of the two estimates. Under
///   the alpha-beta strategy these are heuristic noise scales rather than
///   tracked posterior uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Estimate {
    pub date: NaiveDate,
    pub weight: f64,
    pub tdee: f64,
    pub sd_weight: f64,
    pub sd_tdee: f64,
}
