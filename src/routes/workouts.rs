use axum::{
    extract::{Path, State},
    routing::{post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::celebration::Celebration;
use crate::engine::calendar;
use crate::engine::tracker::{parse_miles, validate_miles, WorkoutTracker, WorkoutUpdate};
use crate::error::{AppError, TrackerError};
use crate::state::AppState;
use crate::types::plan::WorkoutKey;
use crate::types::progress::ProgressSnapshot;
use crate::types::record::WorkoutRecord;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/workouts/:week/:day/complete", post(complete))
        .route("/api/workouts/:week/:day/skip", post(skip))
        .route("/api/workouts/:week/:day/clear", post(clear))
        .route("/api/workouts/:week/:day/toggle-complete", post(toggle_complete))
        .route("/api/workouts/:week/:day/toggle-skip", post(toggle_skip))
        .route("/api/workouts/:week/:day/mileage", put(set_mileage))
}

#[derive(Serialize)]
struct WorkoutResponse {
    key: WorkoutKey,
    record: WorkoutRecord,
    celebration: Option<Celebration>,
    progress: ProgressSnapshot,
}

#[derive(Deserialize)]
struct MileageRequest {
    miles: Value,
}

/// Runs one mutation under the tracker lock and reports the refreshed progress.
async fn apply<F>(state: &AppState, op: F) -> Result<Json<WorkoutResponse>, AppError>
where
    F: FnOnce(&mut WorkoutTracker) -> Result<WorkoutUpdate, TrackerError>,
{
    let mut tracker = state.tracker().lock().await;
    let update = op(&mut tracker)?;
    let celebration = update
        .milestone
        .map(|milestone| state.celebrations().show(milestone));

    Ok(Json(WorkoutResponse {
        key: update.key,
        record: update.record,
        celebration,
        progress: tracker.progress(calendar::today()),
    }))
}

async fn complete(
    State(state): State<AppState>,
    Path((week, day)): Path<(u32, u8)>,
) -> Result<Json<WorkoutResponse>, AppError> {
    apply(&state, |tracker| tracker.mark_complete(WorkoutKey::new(week, day))).await
}

async fn skip(
    State(state): State<AppState>,
    Path((week, day)): Path<(u32, u8)>,
) -> Result<Json<WorkoutResponse>, AppError> {
    apply(&state, |tracker| tracker.mark_skipped(WorkoutKey::new(week, day))).await
}

async fn clear(
    State(state): State<AppState>,
    Path((week, day)): Path<(u32, u8)>,
) -> Result<Json<WorkoutResponse>, AppError> {
    apply(&state, |tracker| tracker.clear_status(WorkoutKey::new(week, day))).await
}

async fn toggle_complete(
    State(state): State<AppState>,
    Path((week, day)): Path<(u32, u8)>,
) -> Result<Json<WorkoutResponse>, AppError> {
    apply(&state, |tracker| tracker.toggle_complete(WorkoutKey::new(week, day))).await
}

async fn toggle_skip(
    State(state): State<AppState>,
    Path((week, day)): Path<(u32, u8)>,
) -> Result<Json<WorkoutResponse>, AppError> {
    apply(&state, |tracker| tracker.toggle_skipped(WorkoutKey::new(week, day))).await
}

async fn set_mileage(
    State(state): State<AppState>,
    Path((week, day)): Path<(u32, u8)>,
    Json(req): Json<MileageRequest>,
) -> Result<Json<WorkoutResponse>, AppError> {
    let miles = match &req.miles {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| TrackerError::InvalidMileageInput(number.to_string()))
            .and_then(validate_miles)?,
        Value::String(raw) => parse_miles(raw)?,
        other => {
            return Err(TrackerError::InvalidMileageInput(format!(
                "expected a number, got {}",
                other
            ))
            .into())
        }
    };

    apply(&state, |tracker| {
        tracker.set_actual_miles(WorkoutKey::new(week, day), miles)
    })
    .await
}
