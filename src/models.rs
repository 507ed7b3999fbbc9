use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use chrono::{NaiveDate, DateTime, Utc};

use crate::error::ValidationError;

pub const DEFAULT_CYCLE_LENGTH: i32 = 28;
pub const DEFAULT_PERIOD_LENGTH: i32 = 5;
pub const DEFAULT_REMINDER_DAYS_BEFORE: i32 = 2;

const CYCLE_LENGTH_RANGE: std::ops::RangeInclusive<i32> = 21..=35;
const PERIOD_LENGTH_RANGE: std::ops::RangeInclusive<i32> = 3..=10;
const REMINDER_DAYS_RANGE: std::ops::RangeInclusive<i32> = 0..=7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CycleRecord {
    pub id: Uuid,
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub cycle_length: Option<i32>,
    pub period_length: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CycleRecord {
    /// Applies a partial update, re-deriving `period_length` when the end date changes.
    pub fn apply_update(&mut self, update: CycleUpdate) -> Result<(), ValidationError> {
        if let Some(end_date) = update.end_date {
            self.period_length = Some(period_length_between(self.start_date, end_date)?);
            self.end_date = Some(end_date);
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        Ok(())
    }
}

/// Inclusive length of a period in days. Rejects an end before the start.
pub fn period_length_between(start: NaiveDate, end: NaiveDate) -> Result<i32, ValidationError> {
    if end < start {
        return Err(ValidationError::EndBeforeStart { start, end });
    }
    Ok((end - start).num_days() as i32 + 1)
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCycleRecord {
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewCycleRecord {
    pub fn period_length(&self) -> Result<Option<i32>, ValidationError> {
        self.end_date
            .map(|end| period_length_between(self.start_date, end))
            .transpose()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CycleUpdate {
    pub end_date: Option<NaiveDate>,
    // absent = keep, null = clear
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Preferences {
    pub id: Uuid,
    pub user_id: String,
    pub average_cycle_length: i32,
    pub average_period_length: i32,
    pub reminder_days_before: i32,
    pub notification_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Preferences {
    /// Default preferences for a user that never saved any. Not persisted.
    pub fn defaults_for(user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::nil(),
            user_id: user_id.to_owned(),
            average_cycle_length: DEFAULT_CYCLE_LENGTH,
            average_period_length: DEFAULT_PERIOD_LENGTH,
            reminder_days_before: DEFAULT_REMINDER_DAYS_BEFORE,
            notification_enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: &PreferencesUpdate) {
        if let Some(v) = update.average_cycle_length {
            self.average_cycle_length = v;
        }
        if let Some(v) = update.average_period_length {
            self.average_period_length = v;
        }
        if let Some(v) = update.reminder_days_before {
            self.reminder_days_before = v;
        }
        if let Some(v) = update.notification_enabled {
            self.notification_enabled = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesUpdate {
    pub user_id: String,
    pub average_cycle_length: Option<i32>,
    pub average_period_length: Option<i32>,
    pub reminder_days_before: Option<i32>,
    pub notification_enabled: Option<bool>,
}

impl PreferencesUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("average_cycle_length", self.average_cycle_length, CYCLE_LENGTH_RANGE)?;
        check_range("average_period_length", self.average_period_length, PERIOD_LENGTH_RANGE)?;
        check_range("reminder_days_before", self.reminder_days_before, REMINDER_DAYS_RANGE)?;
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: Option<i32>,
    range: std::ops::RangeInclusive<i32>,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if !range.contains(&v) => Err(ValidationError::OutOfRange {
            field,
            value: v,
            min: *range.start(),
            max: *range.end(),
        }),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseInfo {
    pub phase: CyclePhase,
    pub day_in_cycle: i64,
    pub days_until_next_period: Option<i64>,
    pub is_fertile_window: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CyclePrediction {
    pub next_period_date: NaiveDate,
    pub next_ovulation_date: NaiveDate,
    pub fertile_window_start: NaiveDate,
    pub fertile_window_end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "flow_intensity", rename_all = "lowercase")]
pub enum FlowIntensity {
    None,
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "mood", rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Bad,
    Terrible,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct DailyTracking {
    pub id: Uuid,
    pub user_id: String,
    pub date: NaiveDate,
    pub flow_intensity: Option<FlowIntensity>,
    pub symptoms: Option<Vec<String>>,
    pub mood: Option<Mood>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDailyTracking {
    pub user_id: String,
    pub date: NaiveDate,
    pub flow_intensity: Option<FlowIntensity>,
    pub symptoms: Option<Vec<String>>,
    pub mood: Option<Mood>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
pub enum NotificationType {
    PeriodStart,
    Ovulation,
    Pms,
    FertileWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub scheduled_date: DateTime<Utc>,
    pub is_sent: bool,
    pub created_at: DateTime<Utc>,
}
