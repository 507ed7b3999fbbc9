use chrono::{Duration, NaiveDate};

use super::{most_recent_cycle, PhaseRules};
use crate::models::{CycleRecord, CyclePrediction, Preferences};

/// Next period, ovulation and fertile window, counted from the most recent
/// period start. Without history the cycle is assumed to start `today`.
pub fn compute_prediction(
    history: &[CycleRecord],
    preferences: Option<&Preferences>,
    today: NaiveDate,
) -> CyclePrediction {
    PhaseRules::STANDARD.predict(history, preferences, today)
}

impl PhaseRules {
    pub fn predict(
        &self,
        history: &[CycleRecord],
        preferences: Option<&Preferences>,
        today: NaiveDate,
    ) -> CyclePrediction {
        let averages = self.averages(preferences);
        let last_period_start = most_recent_cycle(history)
            .map(|cycle| cycle.start_date)
            .unwrap_or(today);

        let next_period_date = shift(last_period_start, averages.cycle_length);
        let next_ovulation_date = shift(next_period_date, -self.luteal_length);

        CyclePrediction {
            next_period_date,
            next_ovulation_date,
            fertile_window_start: shift(next_ovulation_date, -self.fertile_days_before_ovulation),
            fertile_window_end: shift(next_ovulation_date, self.fertile_days_after_ovulation),
        }
    }
}

/// Moves `date` by `days`, clamping at the ends of the representable calendar.
fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}
