use axum::{
    Router,
    routing::post,
    extract::{State, Query},
    Json,
    http::StatusCode,
};

use super::{AppState, UserQuery};
use crate::error::ApiError;
use crate::models::{DailyTracking, NewDailyTracking};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/tracking", post(log_day).get(get_tracking))
        .with_state(state)
}

async fn log_day(
    State(state): State<AppState>,
    Json(body): Json<NewDailyTracking>,
) -> Result<(StatusCode, Json<DailyTracking>), ApiError> {
    let tracking = state.store.create_tracking(body).await?;
    tracing::info!("📝 Logged {} for {}", tracking.date, tracking.user_id);

    Ok((StatusCode::CREATED, Json(tracking)))
}

async fn get_tracking(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<DailyTracking>>, ApiError> {
    Ok(Json(state.store.list_tracking(&query.user_id).await?))
}
