use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::CycleStore;
use crate::error::StoreError;
use crate::models::{
    CycleRecord, CycleUpdate, DailyTracking, NewCycleRecord, NewDailyTracking, Notification,
    Preferences, PreferencesUpdate, DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_LENGTH,
    DEFAULT_REMINDER_DAYS_BEFORE,
};

const CYCLE_COLUMNS: &str =
    "id, user_id, start_date, end_date, cycle_length, period_length, notes, created_at, updated_at";
const PREFERENCE_COLUMNS: &str = "id, user_id, average_cycle_length, average_period_length, \
     reminder_days_before, notification_enabled, created_at, updated_at";
const TRACKING_COLUMNS: &str =
    "id, user_id, date, flow_intensity, symptoms, mood, notes, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_cycle(&self, id: Uuid) -> Result<Option<CycleRecord>, StoreError> {
        let record = sqlx::query_as::<_, CycleRecord>(&format!(
            "SELECT {CYCLE_COLUMNS} FROM cycle_entries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

#[async_trait]
impl CycleStore for PgStore {
    async fn create_cycle(&self, new: NewCycleRecord) -> Result<CycleRecord, StoreError> {
        let period_length = new.period_length()?;

        let record = sqlx::query_as::<_, CycleRecord>(&format!(
            "INSERT INTO cycle_entries (id, user_id, start_date, end_date, period_length, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {CYCLE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.user_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(period_length)
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update_cycle(
        &self,
        id: Uuid,
        update: CycleUpdate,
    ) -> Result<CycleRecord, StoreError> {
        let mut record = self
            .find_cycle(id)
            .await?
            .ok_or(StoreError::NotFound("cycle entry"))?;
        record.apply_update(update)?;

        let record = sqlx::query_as::<_, CycleRecord>(&format!(
            "UPDATE cycle_entries
             SET end_date = $2, period_length = $3, notes = $4, updated_at = now()
             WHERE id = $1
             RETURNING {CYCLE_COLUMNS}"
        ))
        .bind(id)
        .bind(record.end_date)
        .bind(record.period_length)
        .bind(&record.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("cycle entry"))?;

        Ok(record)
    }

    async fn delete_cycle(&self, id: Uuid) -> Result<CycleRecord, StoreError> {
        sqlx::query_as::<_, CycleRecord>(&format!(
            "DELETE FROM cycle_entries WHERE id = $1 RETURNING {CYCLE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("cycle entry"))
    }

    async fn list_cycles(&self, user_id: &str) -> Result<Vec<CycleRecord>, StoreError> {
        let records = sqlx::query_as::<_, CycleRecord>(&format!(
            "SELECT {CYCLE_COLUMNS} FROM cycle_entries
             WHERE user_id = $1
             ORDER BY start_date DESC, created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn most_recent_cycle(&self, user_id: &str) -> Result<Option<CycleRecord>, StoreError> {
        let record = sqlx::query_as::<_, CycleRecord>(&format!(
            "SELECT {CYCLE_COLUMNS} FROM cycle_entries
             WHERE user_id = $1
             ORDER BY start_date DESC, created_at DESC
             LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn preferences(&self, user_id: &str) -> Result<Option<Preferences>, StoreError> {
        let prefs = sqlx::query_as::<_, Preferences>(&format!(
            "SELECT {PREFERENCE_COLUMNS} FROM user_preferences WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(prefs)
    }

    async fn upsert_preferences(
        &self,
        update: PreferencesUpdate,
    ) -> Result<Preferences, StoreError> {
        update.validate()?;

        let prefs = sqlx::query_as::<_, Preferences>(&format!(
            "INSERT INTO user_preferences
                (id, user_id, average_cycle_length, average_period_length,
                 reminder_days_before, notification_enabled)
             VALUES ($1, $2, COALESCE($3, $7), COALESCE($4, $8), COALESCE($5, $9), COALESCE($6, TRUE))
             ON CONFLICT (user_id) DO UPDATE SET
                average_cycle_length = COALESCE($3, user_preferences.average_cycle_length),
                average_period_length = COALESCE($4, user_preferences.average_period_length),
                reminder_days_before = COALESCE($5, user_preferences.reminder_days_before),
                notification_enabled = COALESCE($6, user_preferences.notification_enabled),
                updated_at = now()
             RETURNING {PREFERENCE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&update.user_id)
        .bind(update.average_cycle_length)
        .bind(update.average_period_length)
        .bind(update.reminder_days_before)
        .bind(update.notification_enabled)
        .bind(DEFAULT_CYCLE_LENGTH)
        .bind(DEFAULT_PERIOD_LENGTH)
        .bind(DEFAULT_REMINDER_DAYS_BEFORE)
        .fetch_one(&self.pool)
        .await?;

        Ok(prefs)
    }

    async fn create_tracking(&self, new: NewDailyTracking) -> Result<DailyTracking, StoreError> {
        let tracking = sqlx::query_as::<_, DailyTracking>(&format!(
            "INSERT INTO daily_tracking (id, user_id, date, flow_intensity, symptoms, mood, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {TRACKING_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.user_id)
        .bind(new.date)
        .bind(new.flow_intensity)
        .bind(&new.symptoms)
        .bind(new.mood)
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(tracking)
    }

    async fn list_tracking(&self, user_id: &str) -> Result<Vec<DailyTracking>, StoreError> {
        let rows = sqlx::query_as::<_, DailyTracking>(&format!(
            "SELECT {TRACKING_COLUMNS} FROM daily_tracking
             WHERE user_id = $1
             ORDER BY date DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn upcoming_notifications(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Notification>, StoreError> {
        let rows = sqlx::query_as::<_, Notification>(
            "SELECT id, user_id, notification_type, title, message, scheduled_date, is_sent, created_at
             FROM notifications
             WHERE user_id = $1 AND is_sent = FALSE AND scheduled_date >= $2
             ORDER BY scheduled_date ASC",
        )
        .bind(user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
