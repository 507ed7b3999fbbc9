//! Persistence of cycle records, daily tracking, preferences and notifications.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    CycleRecord, CycleUpdate, DailyTracking, NewCycleRecord, NewDailyTracking, Notification,
    Preferences, PreferencesUpdate,
};

#[async_trait]
pub trait CycleStore: Send + Sync {
    async fn create_cycle(&self, new: NewCycleRecord) -> Result<CycleRecord, StoreError>;

    async fn update_cycle(&self, id: Uuid, update: CycleUpdate)
        -> Result<CycleRecord, StoreError>;

    /// Removes the record and returns it.
    async fn delete_cycle(&self, id: Uuid) -> Result<CycleRecord, StoreError>;

    /// All of a user's records, newest `start_date` first.
    async fn list_cycles(&self, user_id: &str) -> Result<Vec<CycleRecord>, StoreError>;

    async fn most_recent_cycle(&self, user_id: &str) -> Result<Option<CycleRecord>, StoreError>;

    async fn preferences(&self, user_id: &str) -> Result<Option<Preferences>, StoreError>;

    /// Creates the user's preferences (defaults for missing fields) or patches them.
    async fn upsert_preferences(
        &self,
        update: PreferencesUpdate,
    ) -> Result<Preferences, StoreError>;

    async fn create_tracking(&self, new: NewDailyTracking) -> Result<DailyTracking, StoreError>;

    /// Newest date first.
    async fn list_tracking(&self, user_id: &str) -> Result<Vec<DailyTracking>, StoreError>;

    /// Unsent notifications scheduled at or after `now`, soonest first.
    async fn upcoming_notifications(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Notification>, StoreError>;
}
