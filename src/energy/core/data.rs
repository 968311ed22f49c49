//! Observation records and the validated observation log.
//!
//! Purpose
//! -------
//! Represent one day of tracking data (`date`, scale `weight`, reported
//! `calories`) and provide an optional validated container for collaborators
//! that want the crate to enforce the input contract before a replay.
//!
//! Key behaviors
//! -------------
//! - [`Observation`] is plain data; the replay engine accepts any slice of
//!   observations and performs no checks of its own.
//! - [`ObservationLog::new`] enforces finiteness, `weight > 0`,
//!   `calories >= 0` and strictly increasing dates.
//! - [`ObservationLog::from_unsorted`] and [`ObservationLog::upsert`] apply
//!   the "later entry for a date replaces the earlier one" rule.
//! - [`elapsed_days`] converts a date pair into fractional days.
//!
//! Invariants & assumptions
//! ------------------------
//! - An empty log is valid; replaying it yields no estimates.
//! - Dates are calendar dates without time zone. Elapsed time is computed
//!   from the signed difference, so out-of-order pairs give negative `dt`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover construction failures (each validation branch),
//!   deduplication order, and upsert replace/insert behavior.
use crate::energy::errors::{EnergyError, EnergyResult};
use chrono::NaiveDate;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One day of tracking data.
///
/// Fields
/// ------
/// - `date`: calendar date of the weigh-in.
/// - `weight`: scale reading in kg.
/// - `calories`: intake reported for that day in kcal. It is attributed to the
///   interval that *starts* at `date`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    pub date: NaiveDate,
    pub weight: f64,
    pub calories: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, weight: f64, calories: f64) -> Self {
        Observation { date, weight, calories }
    }
}

/// Fractional days from `from` to `to` (negative when `to` precedes `from`).
pub fn elapsed_days(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_seconds() as f64 / SECONDS_PER_DAY
}

/// `ObservationLog`: date-ordered, date-unique, validated observations.
///
/// Purpose
/// -------
/// Give collaborators a single place to normalize user-entered rows before
/// replay, and give calibration a data type that is known to be well formed.
///
/// Invariants
/// ----------
/// - Dates are strictly increasing.
/// - Every weight is finite and > 0; every calorie figure is finite and >= 0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObservationLog {
    entries: Vec<Observation>,
}

impl ObservationLog {
    /// Construct a validated log from already ordered entries.
    ///
    /// Errors
    /// ------
    /// - `EnergyError::NonFiniteData` for NaN/±inf weight or calories.
    /// - `EnergyError::NonPositiveWeight` for `weight <= 0`.
    /// - `EnergyError::NegativeCalories` for `calories < 0`.
    /// - `EnergyError::UnorderedDates` when a date is not after its predecessor.
    pub fn new(entries: Vec<Observation>) -> EnergyResult<Self> {
        for (index, obs) in entries.iter().enumerate() {
            validate_observation(index, obs)?;
            if index > 0 && obs.date <= entries[index - 1].date {
                return Err(EnergyError::UnorderedDates { index });
            }
        }
        Ok(ObservationLog { entries })
    }

    /// Sort by date and collapse repeated dates, keeping the entry that
    /// appears last in `entries`, then validate.
    pub fn from_unsorted(mut entries: Vec<Observation>) -> EnergyResult<Self> {
        // Stable sort keeps input order within a date, so the last one wins below.
        entries.sort_by_key(|obs| obs.date);
        let mut deduped: Vec<Observation> = Vec::with_capacity(entries.len());
        for obs in entries {
            match deduped.last_mut() {
                Some(last) if last.date == obs.date => *last = obs,
                _ => deduped.push(obs),
            }
        }
        ObservationLog::new(deduped)
    }

    /// Replace the entry for `obs.date`, or insert it at its sorted position.
    ///
    /// Errors
    /// ------
    /// Validation errors for `obs` itself; the log is left unchanged.
    pub fn upsert(&mut self, obs: Observation) -> EnergyResult<()> {
        match self.entries.binary_search_by_key(&obs.date, |e| e.date) {
            Ok(pos) => {
                validate_observation(pos, &obs)?;
                self.entries[pos] = obs;
            }
            Err(pos) => {
                validate_observation(pos, &obs)?;
                self.entries.insert(pos, obs);
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> &[Observation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.entries.last()
    }
}

impl AsRef<[Observation]> for ObservationLog {
    fn as_ref(&self) -> &[Observation] {
        &self.entries
    }
}

// ---- Helper Methods ----

fn validate_observation(index: usize, obs: &Observation) -> EnergyResult<()> {
    if !obs.weight.is_finite() {
        return Err(EnergyError::NonFiniteData { index, field: "weight", value: obs.weight });
    }
    if !obs.calories.is_finite() {
        return Err(EnergyError::NonFiniteData { index, field: "calories", value: obs.calories });
    }
    if obs.weight <= 0.0 {
        return Err(EnergyError::NonPositiveWeight { index, value: obs.weight });
    }
    if obs.calories < 0.0 {
        return Err(EnergyError::NegativeCalories { index, value: obs.calories });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - `ObservationLog::new` validation branches.
    // - `from_unsorted` ordering and last-entry-wins deduplication.
    // - `upsert` replace vs insert.
    // - `elapsed_days` sign and magnitude.
    // -------------------------------------------------------------------------

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // A well-formed, strictly increasing series is accepted as is.
    //
    // Given
    // -----
    // - Three observations on consecutive days.
    //
    // Expect
    // ------
    // - `Ok`, same entries in the same order.
    fn new_accepts_ordered_valid_entries() {
        // Arrange
        let entries = vec![
            Observation::new(day(1), 80.0, 2200.0),
            Observation::new(day(2), 79.8, 2100.0),
            Observation::new(day(4), 79.7, 0.0),
        ];

        // Act
        let log = ObservationLog::new(entries.clone()).expect("log should be valid");

        // Assert
        assert_eq!(log.entries(), entries.as_slice());
        assert_eq!(log.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Each numeric contract violation maps to its own error variant.
    //
    // Given
    // -----
    // - Single-entry logs with NaN weight, zero weight, negative calories.
    //
    // Expect
    // ------
    // - `NonFiniteData`, `NonPositiveWeight`, `NegativeCalories` respectively.
    fn new_rejects_each_numeric_violation() {
        // Arrange
        let nan = vec![Observation::new(day(1), f64::NAN, 2000.0)];
        let zero = vec![Observation::new(day(1), 0.0, 2000.0)];
        let negative = vec![Observation::new(day(1), 70.0, -1.0)];

        // Act / Assert
        assert!(matches!(
            ObservationLog::new(nan),
            Err(EnergyError::NonFiniteData { index: 0, field: "weight", .. })
        ));
        assert_eq!(
            ObservationLog::new(zero),
            Err(EnergyError::NonPositiveWeight { index: 0, value: 0.0 })
        );
        assert_eq!(
            ObservationLog::new(negative),
            Err(EnergyError::NegativeCalories { index: 0, value: -1.0 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Repeated or decreasing dates are rejected by the strict constructor.
    //
    // Given
    // -----
    // - Two entries sharing a date.
    //
    // Expect
    // ------
    // - `UnorderedDates { index: 1 }`.
    fn new_rejects_repeated_dates() {
        // Arrange
        let entries =
            vec![Observation::new(day(1), 70.0, 2000.0), Observation::new(day(1), 70.2, 2000.0)];

        // Act
        let result = ObservationLog::new(entries);

        // Assert
        assert_eq!(result, Err(EnergyError::UnorderedDates { index: 1 }));
    }

    #[test]
    // Purpose
    // -------
    // `from_unsorted` sorts by date and keeps the later of two same-date rows.
    //
    // Given
    // -----
    // - Rows out of order with day 2 entered twice (71.0 first, 70.5 second).
    //
    // Expect
    // ------
    // - Dates 1, 2, 3 and the day-2 weight is 70.5.
    fn from_unsorted_sorts_and_keeps_last_duplicate() {
        // Arrange
        let entries = vec![
            Observation::new(day(3), 70.1, 1900.0),
            Observation::new(day(2), 71.0, 2000.0),
            Observation::new(day(1), 71.5, 2100.0),
            Observation::new(day(2), 70.5, 2050.0),
        ];

        // Act
        let log = ObservationLog::from_unsorted(entries).expect("normalized log should be valid");

        // Assert
        let dates: Vec<NaiveDate> = log.entries().iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
        assert_relative_eq!(log.entries()[1].weight, 70.5);
        assert_relative_eq!(log.entries()[1].calories, 2050.0);
    }

    #[test]
    // Purpose
    // -------
    // `upsert` replaces an existing date and inserts a new one in order.
    //
    // Given
    // -----
    // - Log with days 1 and 3; upsert day 3 then day 2.
    //
    // Expect
    // ------
    // - Day 3 is replaced, day 2 lands between the others.
    fn upsert_replaces_then_inserts_in_order() {
        // Arrange
        let mut log = ObservationLog::new(vec![
            Observation::new(day(1), 70.0, 2000.0),
            Observation::new(day(3), 69.8, 2000.0),
        ])
        .expect("log should be valid");

        // Act
        log.upsert(Observation::new(day(3), 69.5, 1800.0)).expect("replace should succeed");
        log.upsert(Observation::new(day(2), 69.9, 1900.0)).expect("insert should succeed");

        // Assert
        assert_eq!(log.len(), 3);
        assert_eq!(log.entries()[1].date, day(2));
        assert_relative_eq!(log.entries()[2].weight, 69.5);
        assert!(log.upsert(Observation::new(day(5), -3.0, 0.0)).is_err());
        assert_eq!(log.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Elapsed time is signed and measured in days.
    //
    // Given
    // -----
    // - Dates three days apart, in both orders.
    //
    // Expect
    // ------
    // - `3.0` forward, `-3.0` backward, `0.0` for the same date.
    fn elapsed_days_is_signed() {
        assert_relative_eq!(elapsed_days(day(1), day(4)), 3.0);
        assert_relative_eq!(elapsed_days(day(4), day(1)), -3.0);
        assert_relative_eq!(elapsed_days(day(4), day(4)), 0.0);
    }
}
