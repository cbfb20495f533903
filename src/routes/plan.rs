use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::{calendar, schedule, tracker::WorkoutTracker};
use crate::error::AppError;
use crate::state::AppState;
use crate::types::plan::PlanConfig;
use crate::types::progress::WeekView;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/plan", get(get_plan))
        .route("/api/plan/start-date", put(set_start_date))
}

#[derive(Serialize)]
struct PlanResponse {
    config: PlanConfig,
    today: NaiveDate,
    current_week: Option<u32>,
    weeks: Vec<WeekView>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StartDateRequest {
    start_date: String,
}

fn plan_response(tracker: &WorkoutTracker) -> PlanResponse {
    let today = calendar::today();
    let config = tracker.config().clone();
    PlanResponse {
        current_week: calendar::current_week_on(config.start_date, config.num_weeks, today),
        weeks: schedule::build_week_views(
            tracker.plan(),
            tracker.records(),
            config.start_date,
            today,
        ),
        today,
        config,
    }
}

async fn get_plan(State(state): State<AppState>) -> Json<PlanResponse> {
    let tracker = state.tracker().lock().await;
    Json(plan_response(&tracker))
}

async fn set_start_date(
    State(state): State<AppState>,
    Json(req): Json<StartDateRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let start_date = NaiveDate::parse_from_str(req.start_date.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest(format!(
            "Invalid start_date: {}. Use YYYY-MM-DD",
            req.start_date
        ))
    })?;

    let mut tracker = state.tracker().lock().await;
    tracker.set_start_date(start_date)?;
    Ok(Json(plan_response(&tracker)))
}
