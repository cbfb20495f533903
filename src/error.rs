use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::types::plan::WorkoutKey;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Invalid mileage: {0}")]
    InvalidMileageInput(String),
    #[error("Workout {0} is outside the plan")]
    OutOfRangeKey(WorkoutKey),
    #[error("Workout {0} is a rest day and cannot be completed or skipped")]
    RestDayNotTrackable(WorkoutKey),
    #[error("Invalid plan config: {0}")]
    InvalidPlanConfig(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Tracker(TrackerError::OutOfRangeKey(_)) => StatusCode::NOT_FOUND,
            AppError::Tracker(TrackerError::InvalidMileageInput(_))
            | AppError::Tracker(TrackerError::RestDayNotTrackable(_))
            | AppError::Tracker(TrackerError::InvalidPlanConfig(_))
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Tracker(TrackerError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
