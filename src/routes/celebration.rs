use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::engine::celebration::Celebration;
use crate::engine::milestone::MILESTONES;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/celebration", get(celebration))
}

#[derive(Serialize)]
struct CelebrationResponse {
    celebration: Option<Celebration>,
    celebrated: Vec<u32>,
    remaining: Vec<u32>,
    ttl_seconds: f64,
}

async fn celebration(State(state): State<AppState>) -> Json<CelebrationResponse> {
    let tracker = state.tracker().lock().await;
    let celebrated: Vec<u32> = tracker.celebrated().iter().copied().collect();
    let remaining = MILESTONES
        .iter()
        .copied()
        .filter(|m| !celebrated.contains(m))
        .collect();

    Json(CelebrationResponse {
        celebration: state.celebrations().current(),
        celebrated,
        remaining,
        ttl_seconds: state.celebrations().ttl().as_secs_f64(),
    })
}
