use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CycleStore;
use crate::error::StoreError;
use crate::models::{
    CycleRecord, CycleUpdate, DailyTracking, NewCycleRecord, NewDailyTracking, Notification,
    Preferences, PreferencesUpdate,
};

/// Process-local store for tests and database-less runs.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    cycles: HashMap<Uuid, CycleRecord>,
    preferences: HashMap<String, Preferences>,
    tracking: Vec<DailyTracking>,
    notifications: Vec<Notification>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications are produced by an external scheduler; this seeds them.
    pub async fn insert_notification(&self, notification: Notification) {
        self.inner.write().await.notifications.push(notification);
    }
}

fn newest_first(records: &mut [CycleRecord]) {
    records.sort_by(|a, b| {
        b.start_date
            .cmp(&a.start_date)
            .then(b.created_at.cmp(&a.created_at))
    });
}

#[async_trait]
impl CycleStore for MemoryStore {
    async fn create_cycle(&self, new: NewCycleRecord) -> Result<CycleRecord, StoreError> {
        let period_length = new.period_length()?;
        let now = Utc::now();
        let record = CycleRecord {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            start_date: new.start_date,
            end_date: new.end_date,
            cycle_length: None,
            period_length,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };

        self.inner
            .write()
            .await
            .cycles
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_cycle(
        &self,
        id: Uuid,
        update: CycleUpdate,
    ) -> Result<CycleRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .cycles
            .get_mut(&id)
            .ok_or(StoreError::NotFound("cycle entry"))?;

        let mut record = stored.clone();
        record.apply_update(update)?;
        record.updated_at = Utc::now();
        *stored = record.clone();
        Ok(record)
    }

    async fn delete_cycle(&self, id: Uuid) -> Result<CycleRecord, StoreError> {
        self.inner
            .write()
            .await
            .cycles
            .remove(&id)
            .ok_or(StoreError::NotFound("cycle entry"))
    }

    async fn list_cycles(&self, user_id: &str) -> Result<Vec<CycleRecord>, StoreError> {
        let inner = self.inner.read().await;
        let mut records: Vec<CycleRecord> = inner
            .cycles
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(records)
    }

    async fn most_recent_cycle(&self, user_id: &str) -> Result<Option<CycleRecord>, StoreError> {
        Ok(self.list_cycles(user_id).await?.into_iter().next())
    }

    async fn preferences(&self, user_id: &str) -> Result<Option<Preferences>, StoreError> {
        Ok(self.inner.read().await.preferences.get(user_id).cloned())
    }

    async fn upsert_preferences(
        &self,
        update: PreferencesUpdate,
    ) -> Result<Preferences, StoreError> {
        update.validate()?;

        let now = Utc::now();
        let mut inner = self.inner.write().await;
        let prefs = inner
            .preferences
            .entry(update.user_id.clone())
            .or_insert_with(|| Preferences {
                id: Uuid::new_v4(),
                ..Preferences::defaults_for(&update.user_id, now)
            });
        prefs.apply_update(&update);
        prefs.updated_at = now;
        Ok(prefs.clone())
    }

    async fn create_tracking(&self, new: NewDailyTracking) -> Result<DailyTracking, StoreError> {
        let now = Utc::now();
        let tracking = DailyTracking {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            date: new.date,
            flow_intensity: new.flow_intensity,
            symptoms: new.symptoms,
            mood: new.mood,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };

        self.inner.write().await.tracking.push(tracking.clone());
        Ok(tracking)
    }

    async fn list_tracking(&self, user_id: &str) -> Result<Vec<DailyTracking>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<DailyTracking> = inner
            .tracking
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn upcoming_notifications(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Notification>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Notification> = inner
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_sent && n.scheduled_date >= now)
            .cloned()
            .collect();
        rows.sort_by_key(|n| n.scheduled_date);
        Ok(rows)
    }
}
