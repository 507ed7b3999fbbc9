use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;

use super::{AppState, UserQuery};
use crate::error::ApiError;
use crate::models::{period_length_between, CycleRecord};

#[derive(Debug, PartialEq, Serialize)]
pub struct CycleStat {
    cycle_number: i32,
    start_date: chrono::NaiveDate,
    period_length: Option<i32>,
    cycle_length: Option<i32>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct CycleStatsResponse {
    average_period_length: Option<f64>,
    average_cycle_length: Option<f64>,
    cycle_stats: Vec<CycleStat>,
}

pub async fn get_cycle_stats(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<CycleStatsResponse>, ApiError> {
    let history = state.store.list_cycles(&query.user_id).await?;
    Ok(Json(summarize(history)))
}

/// Per-cycle lengths in chronological order. A cycle's length is the gap to
/// the next start, so the ongoing cycle has none.
fn summarize(mut history: Vec<CycleRecord>) -> CycleStatsResponse {
    history.sort_by_key(|r| (r.start_date, r.created_at));

    let stats: Vec<CycleStat> = history
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let cycle_length = history
                .get(i + 1)
                .map(|next| (next.start_date - record.start_date).num_days() as i32);
            let period_length = record.period_length.or_else(|| {
                record
                    .end_date
                    .and_then(|end| period_length_between(record.start_date, end).ok())
            });

            CycleStat {
                cycle_number: (i + 1) as i32,
                start_date: record.start_date,
                period_length,
                cycle_length,
            }
        })
        .collect();

    CycleStatsResponse {
        average_period_length: average(stats.iter().filter_map(|s| s.period_length)),
        average_cycle_length: average(stats.iter().filter_map(|s| s.cycle_length)),
        cycle_stats: stats,
    }
}

fn average(values: impl Iterator<Item = i32>) -> Option<f64> {
    let (sum, count) = values.fold((0i64, 0u32), |(sum, count), v| (sum + i64::from(v), count + 1));
    (count > 0).then(|| sum as f64 / f64::from(count))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/cycle-stats", get(get_cycle_stats))
        .with_state(state)
}
