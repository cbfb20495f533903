use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::engine::calendar;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let tracker = state.tracker().lock().await;
    let config = tracker.config();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "weeks": tracker.plan().len(),
        "start_date": config.start_date,
        "current_week": calendar::current_week(config.start_date, config.num_weeks),
    }))
}
