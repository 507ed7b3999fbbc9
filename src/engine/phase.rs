use chrono::NaiveDate;

use super::{effective_cycle_length, most_recent_cycle, PhaseRules};
use crate::models::{CycleRecord, CyclePhase, PhaseInfo, Preferences};

/// Where `today` falls in the user's cycle.
///
/// With no history the user is assumed to be mid-cycle.
pub fn compute_phase(
    history: &[CycleRecord],
    preferences: Option<&Preferences>,
    today: NaiveDate,
) -> PhaseInfo {
    PhaseRules::STANDARD.phase(history, preferences, today)
}

impl PhaseRules {
    pub fn phase(
        &self,
        history: &[CycleRecord],
        preferences: Option<&Preferences>,
        today: NaiveDate,
    ) -> PhaseInfo {
        let averages = self.averages(preferences);

        let Some(cycle) = most_recent_cycle(history) else {
            let midpoint = averages.cycle_length / 2;
            return PhaseInfo {
                phase: CyclePhase::Follicular,
                day_in_cycle: midpoint,
                days_until_next_period: Some(midpoint),
                is_fertile_window: false,
            };
        };

        let cycle_length = effective_cycle_length(cycle, averages);
        let days_since_start = (today - cycle.start_date).num_days();
        // Euclidean so that a start date in the future still lands in 0..cycle_length
        let offset = days_since_start.rem_euclid(cycle_length);

        let day_in_cycle = offset + 1;
        let days_until_next_period = if offset == 0 { 0 } else { cycle_length - offset };

        PhaseInfo {
            phase: self.classify(day_in_cycle, averages.period_length),
            day_in_cycle,
            days_until_next_period: Some(days_until_next_period),
            is_fertile_window: (self.fertile_first_day..=self.fertile_last_day)
                .contains(&day_in_cycle),
        }
    }

    fn classify(&self, day_in_cycle: i64, period_length: i64) -> CyclePhase {
        if day_in_cycle <= period_length {
            CyclePhase::Menstrual
        } else if day_in_cycle <= self.follicular_last_day {
            CyclePhase::Follicular
        } else if day_in_cycle <= self.ovulation_last_day {
            CyclePhase::Ovulation
        } else {
            CyclePhase::Luteal
        }
    }
}
