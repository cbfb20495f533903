pub mod config;
pub mod engine;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;
pub mod types;

use axum::Router;

use crate::state::AppState;

/// Every API router, bound to `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::plan::router())
        .merge(routes::progress::router())
        .merge(routes::workouts::router())
        .merge(routes::celebration::router())
        .with_state(state)
}
