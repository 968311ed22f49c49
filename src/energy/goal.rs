//! Goal advisory: turn the latest estimate into an intake recommendation.
//!
//! The adjustment is proportional to the distance from goal and saturates at
//! one kilogram: `delta = clamp(goal − current, −1, 1) · 500` kcal/day. The
//! recommendation is `tdee + delta`, and the implied pace is
//! `|delta · 7 / density|` kg per week.
use std::fmt;

/// Largest daily intake adjustment in kcal.
pub const MAX_DAILY_ADJUSTMENT: f64 = 500.0;

/// Distance from goal (kg) inside which the advice is to maintain.
pub const MAINTAIN_BAND: f64 = 0.1;

/// Message returned when no usable goal is configured.
pub const INVALID_GOAL_MESSAGE: &str = "Set a valid goal weight.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Lose,
    Gain,
    Maintain,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Direction::Lose => "lose",
            Direction::Gain => "gain",
            Direction::Maintain => "maintain",
        };
        f.write_str(word)
    }
}

/// Intake recommendation.
///
/// Fields
/// ------
/// - `calories`: recommended intake in kcal/day (0 when there is no goal).
/// - `delta`: adjustment relative to the current TDEE.
/// - `weekly_rate`: expected weight change magnitude in kg/week.
/// - `direction`: `None` when there is no valid goal.
/// - `message`: human-readable summary.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalAdvice {
    pub calories: f64,
    pub delta: f64,
    pub weekly_rate: f64,
    pub direction: Option<Direction>,
    pub message: String,
}

/// Recommend a daily intake that moves `current` weight toward `goal`.
///
/// A non-positive `goal` or `fat_energy_density` yields zero calories, zero
/// delta, no direction and [`INVALID_GOAL_MESSAGE`].
pub fn goal_advice(current: f64, goal: f64, tdee: f64, fat_energy_density: f64) -> GoalAdvice {
    if goal <= 0.0 || fat_energy_density <= 0.0 {
        return GoalAdvice {
            calories: 0.0,
            delta: 0.0,
            weekly_rate: 0.0,
            direction: None,
            message: INVALID_GOAL_MESSAGE.to_string(),
        };
    }

    let gap = goal - current;
    let direction = if gap.abs() < MAINTAIN_BAND {
        Direction::Maintain
    } else if gap > 0.0 {
        Direction::Gain
    } else {
        Direction::Lose
    };
    let delta = gap.clamp(-1.0, 1.0) * MAX_DAILY_ADJUSTMENT;
    let weekly_rate = (delta * 7.0 / fat_energy_density).abs();
    let calories = tdee + delta;
    let message = format!(
        "To {direction} weight (~{weekly_rate:.2}kg/week), eat about {calories:.0} kcal/day."
    );
    GoalAdvice { calories, delta, weekly_rate, direction: Some(direction), message }
}
