//! Fixed-gain (alpha-beta) tracker.
//!
//! The weight channel is corrected with a constant gain `α`; the implied
//! weight velocity `(calories − tdee)/density` is corrected with the
//! critically damped partner gain `β = 2(2−α) − 4√(1−α)`, which translates to
//! a TDEE correction of `−(density/dt)·β·r`.
//!
//! Uncertainty is not tracked in this mode. Reported standard deviations are
//! noise scales from the measurement model:
//! `sd_weight = weight_obs_rsd·weight` and
//! `sd_tdee = hypot(weight_obs_rsd·(calories − tdee), calorie_rsd·calories)`.
use crate::energy::core::{
    data::Observation,
    params::EnergyParams,
    predict::Step,
    state::{LatentState, StateCovariance},
};

/// Critically damped velocity gain for a position gain `alpha`.
pub fn beta_gain(alpha: f64) -> f64 {
    2.0 * (2.0 - alpha) - 4.0 * (1.0 - alpha).sqrt()
}

/// Seed a fixed-gain replay from its first observation.
///
/// Mean values match [`LatentState::seed`]; the covariance holds the noise
/// scales of the measurement model instead of the seed variances.
pub fn seed_state(first: &Observation, params: &EnergyParams) -> LatentState {
    let tdee = params.seed_tdee(first.calories);
    let weight = first.weight;
    LatentState { tdee, weight, cov: noise_scale_cov(weight, tdee, first.calories, params) }
}

/// Advance `state` over `step` with fixed gains.
///
/// The caller is responsible for skipping steps with `dt` below the
/// configured threshold; this function divides by `step.dt`.
pub fn alpha_beta_step(
    state: &LatentState, step: &Step, params: &EnergyParams, alpha: f64,
) -> LatentState {
    let density = params.fat_energy_density;
    let predicted = state.weight + (step.calories - state.tdee) / density * step.dt;
    let residual = step.measured_weight - predicted;

    let weight = predicted + alpha * residual;
    let tdee = state.tdee - density / step.dt * beta_gain(alpha) * residual;

    LatentState { tdee, weight, cov: noise_scale_cov(weight, tdee, step.calories, params) }
}

fn noise_scale_cov(
    weight: f64, tdee: f64, calories: f64, params: &EnergyParams,
) -> StateCovariance {
    let sd_w = params.weight_obs_rsd * weight;
    let sd_t = (params.weight_obs_rsd * (calories - tdee)).hypot(params.calorie_rsd * calories);
    StateCovariance { tt: sd_t * sd_t, wt: 0.0, ww: sd_w * sd_w }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - beta gain at known points.
    // - Direction and size of corrections for a single step.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The partner gain matches the closed form at a few alphas.
    //
    // Given
    // -----
    // - alpha = 1/16, 0.75.
    //
    // Expect
    // ------
    // - beta(1/16) = 3.875 − 4·√(15/16); beta(0.75) = 0.5.
    fn beta_gain_closed_form() {
        assert_relative_eq!(
            beta_gain(1.0 / 16.0),
            3.875 - 4.0 * (15.0_f64 / 16.0).sqrt(),
            max_relative = 1e-12
        );
        assert_relative_eq!(beta_gain(0.75), 0.5, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A reading below the prediction means expenditure was underestimated.
    //
    // Given
    // -----
    // - State (2000 kcal, 80 kg), eating 2000 for 1 day, reading 79.9.
    //
    // Expect
    // ------
    // - weight = 80 − α·0.1, tdee = 2000 + 7700·β·0.1.
    fn low_reading_raises_tdee() {
        // Arrange
        let params = EnergyParams::default();
        let alpha = 1.0 / 16.0;
        let state = LatentState {
            tdee: 2000.0,
            weight: 80.0,
            cov: StateCovariance { tt: 0.0, wt: 0.0, ww: 0.0 },
        };
        let step = Step::new(1.0, 2000.0, 79.9);

        // Act
        let next = alpha_beta_step(&state, &step, &params, alpha);

        // Assert
        assert_relative_eq!(next.weight, 80.0 - alpha * 0.1, max_relative = 1e-12);
        assert_relative_eq!(
            next.tdee,
            2000.0 + 7700.0 * beta_gain(alpha) * 0.1,
            max_relative = 1e-9
        );
        assert!(next.sd_tdee() > 0.0 && next.sd_weight() > 0.0);
    }

    #[test]
    // Purpose
    // -------
    // The fixed-gain seed reports measurement noise scales, not the
    // covariance-form seed variances.
    //
    // Given
    // -----
    // - First observation (80 kg, 2000 kcal), default params.
    //
    // Expect
    // ------
    // - Seed means as in the covariance form.
    // - sd_weight = 0.004·80 = 0.32 and sd_tdee = 0.1·2000 = 200.
    fn seed_reports_noise_scales() {
        // Arrange
        let params = EnergyParams::default();
        let first = Observation::new(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            80.0,
            2000.0,
        );

        // Act
        let seed = seed_state(&first, &params);

        // Assert
        let covariance_seed = LatentState::seed(&first, &params);
        assert_eq!(seed.tdee, covariance_seed.tdee);
        assert_eq!(seed.weight, covariance_seed.weight);
        assert_relative_eq!(seed.sd_weight(), 0.32, max_relative = 1e-12);
        assert_relative_eq!(seed.sd_tdee(), 200.0, max_relative = 1e-12);
        assert_eq!(seed.cov.wt, 0.0);
    }
}
