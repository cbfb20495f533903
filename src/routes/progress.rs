use axum::{extract::State, routing::get, Json, Router};

use crate::engine::calendar;
use crate::state::AppState;
use crate::types::progress::ProgressSnapshot;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/progress", get(progress))
}

async fn progress(State(state): State<AppState>) -> Json<ProgressSnapshot> {
    let tracker = state.tracker().lock().await;
    Json(tracker.progress(calendar::today()))
}
