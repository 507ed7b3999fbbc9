//! Cycle phase inference and prediction.
//!
//! Everything here is a pure function of the cycle history, the user's
//! preferences and the calendar day passed in. Nothing reads the clock or
//! touches storage.

mod phase;
mod prediction;

pub use phase::compute_phase;
pub use prediction::compute_prediction;

use crate::models::{CycleRecord, Preferences, DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_LENGTH};

/// Fixed day numbers used by the phase classifier and the predictor.
///
/// Phase and fertility boundaries do not scale with the user's cycle length,
/// so late-cycle phases drift for cycles far from 28 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseRules {
    pub default_cycle_length: i64,
    pub default_period_length: i64,
    /// Last day (1-based) classified as follicular.
    pub follicular_last_day: i64,
    /// Last day (1-based) classified as ovulation.
    pub ovulation_last_day: i64,
    pub fertile_first_day: i64,
    pub fertile_last_day: i64,
    /// Days between predicted ovulation and the next period.
    pub luteal_length: i64,
    pub fertile_days_before_ovulation: i64,
    pub fertile_days_after_ovulation: i64,
}

impl PhaseRules {
    pub const STANDARD: PhaseRules = PhaseRules {
        default_cycle_length: DEFAULT_CYCLE_LENGTH as i64,
        default_period_length: DEFAULT_PERIOD_LENGTH as i64,
        follicular_last_day: 13,
        ovulation_last_day: 16,
        fertile_first_day: 12,
        fertile_last_day: 16,
        luteal_length: 14,
        fertile_days_before_ovulation: 5,
        fertile_days_after_ovulation: 1,
    };

    /// Average lengths from the preferences, or the defaults when absent.
    /// Non-positive values are treated as absent so the modulo stays defined.
    pub(crate) fn averages(&self, preferences: Option<&Preferences>) -> Averages {
        let cycle_length = preferences
            .map(|p| i64::from(p.average_cycle_length))
            .filter(|&len| len > 0)
            .unwrap_or(self.default_cycle_length);
        let period_length = preferences
            .map(|p| i64::from(p.average_period_length))
            .unwrap_or(self.default_period_length);

        Averages {
            cycle_length,
            period_length,
        }
    }
}

impl Default for PhaseRules {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Averages {
    pub cycle_length: i64,
    pub period_length: i64,
}

/// The record with the latest `start_date`. Equal start dates resolve to the
/// most recently created record.
pub fn most_recent_cycle(history: &[CycleRecord]) -> Option<&CycleRecord> {
    history
        .iter()
        .max_by_key(|record| (record.start_date, record.created_at))
}

/// The record's own cycle length when known, otherwise the user's average.
pub(crate) fn effective_cycle_length(record: &CycleRecord, averages: Averages) -> i64 {
    record
        .cycle_length
        .map(i64::from)
        .filter(|&len| len > 0)
        .unwrap_or(averages.cycle_length)
}
