use std::sync::Arc;

use axum::{routing::get, Router};
use serde::Deserialize;

use crate::clock::Clock;
use crate::error::StoreError;
use crate::models::{CycleRecord, Preferences};
use crate::store::CycleStore;

pub mod cycle;
pub mod cycle_stats;
pub mod notifications;
pub mod preferences;
pub mod tracking;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CycleStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn CycleStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Most recent cycle (as a one-element history) and stored preferences.
    pub(crate) async fn engine_inputs(
        &self,
        user_id: &str,
    ) -> Result<(Vec<CycleRecord>, Option<Preferences>), StoreError> {
        let history = self
            .store
            .most_recent_cycle(user_id)
            .await?
            .into_iter()
            .collect();
        let preferences = self.store.preferences(user_id).await?;
        Ok((history, preferences))
    }
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(cycle::routes(state.clone()))
        .merge(cycle_stats::routes(state.clone()))
        .merge(tracking::routes(state.clone()))
        .merge(preferences::routes(state.clone()))
        .merge(notifications::routes(state))
        .route("/health", get(|| async { "✅ Backend up" }))
}
