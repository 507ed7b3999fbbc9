use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use super::{AppState, UserQuery};
use crate::error::ApiError;
use crate::models::Notification;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/notifications/upcoming", get(get_upcoming))
        .with_state(state)
}

async fn get_upcoming(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let now = state.clock.now();
    Ok(Json(state.store.upcoming_notifications(&query.user_id, now).await?))
}
