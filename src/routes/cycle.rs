use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use super::{AppState, UserQuery};
use crate::calendar::export_ics;
use crate::engine::{compute_phase, compute_prediction};
use crate::error::ApiError;
use crate::models::{CycleRecord, CyclePrediction, CycleUpdate, NewCycleRecord, PhaseInfo};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/cycle", post(create_cycle))
        .route("/cycle/:id", patch(update_cycle).delete(delete_cycle))
        .route("/cycles", get(list_cycles))
        .route("/cycle/phase", get(get_current_phase))
        .route("/cycle/predictions", get(get_predictions))
        .route("/cycle/calendar.ics", get(get_calendar))
        .with_state(state)
}

async fn create_cycle(
    State(state): State<AppState>,
    Json(body): Json<NewCycleRecord>,
) -> Result<(StatusCode, Json<CycleRecord>), ApiError> {
    let record = state.store.create_cycle(body).await?;
    tracing::info!("🩸 Cycle {} started {} for {}", record.id, record.start_date, record.user_id);

    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_cycle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CycleUpdate>,
) -> Result<Json<CycleRecord>, ApiError> {
    let record = state.store.update_cycle(id, body).await?;
    Ok(Json(record))
}

async fn delete_cycle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CycleRecord>, ApiError> {
    let record = state.store.delete_cycle(id).await?;
    tracing::info!("🗑️ Deleted cycle {}", record.id);
    Ok(Json(record))
}

async fn list_cycles(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<Vec<CycleRecord>>, ApiError> {
    Ok(Json(state.store.list_cycles(&params.user_id).await?))
}

async fn get_current_phase(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<PhaseInfo>, ApiError> {
    let (history, preferences) = state.engine_inputs(&params.user_id).await?;
    let info = compute_phase(&history, preferences.as_ref(), state.clock.today());

    tracing::debug!(
        user_id = %params.user_id,
        phase = ?info.phase,
        day = info.day_in_cycle,
        "computed phase"
    );
    Ok(Json(info))
}

async fn get_predictions(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<CyclePrediction>, ApiError> {
    let (history, preferences) = state.engine_inputs(&params.user_id).await?;
    Ok(Json(compute_prediction(
        &history,
        preferences.as_ref(),
        state.clock.today(),
    )))
}

async fn get_calendar(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (history, preferences) = state.engine_inputs(&params.user_id).await?;
    let now = state.clock.now();
    let prediction = compute_prediction(&history, preferences.as_ref(), now.date_naive());
    let ics = export_ics(&prediction, &params.user_id, now);

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"cycle-predictions.ics\"",
            ),
        ],
        ics,
    ))
}
