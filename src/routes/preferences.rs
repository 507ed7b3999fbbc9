use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use super::{AppState, UserQuery};
use crate::error::ApiError;
use crate::models::{Preferences, PreferencesUpdate};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/preferences", get(get_preferences).put(update_preferences))
        .with_state(state)
}

/// Stored preferences, or the defaults when the user never saved any.
/// Defaults are returned without being persisted.
async fn get_preferences(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Preferences>, ApiError> {
    let prefs = match state.store.preferences(&query.user_id).await? {
        Some(prefs) => prefs,
        None => Preferences::defaults_for(&query.user_id, state.clock.now()),
    };
    Ok(Json(prefs))
}

async fn update_preferences(
    State(state): State<AppState>,
    Json(body): Json<PreferencesUpdate>,
) -> Result<Json<Preferences>, ApiError> {
    if body.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("user_id must not be empty".into()));
    }

    let prefs = state.store.upsert_preferences(body).await?;
    tracing::info!("⚙️ Preferences saved for {}", prefs.user_id);
    Ok(Json(prefs))
}
