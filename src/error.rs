use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;

/// Input that the record store refuses to persist.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("end_date {end} is before start_date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) | ApiError::Store(StoreError::Invalid(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Database(e)) => {
                tracing::error!("❌ DB error: {:?}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "DB error".to_string()).into_response();
            }
        };

        tracing::info!("ℹ️ Rejected request: {}", self);
        (status, self.to_string()).into_response()
    }
}
