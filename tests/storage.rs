use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use century_plan::storage::{keys, FileStore, KeyValueStore, MemoryStore};
use century_plan::{config::Config, state::AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

#[test]
fn memory_store_round_trips_values() {
    let store = MemoryStore::new();
    assert!(store.is_empty());
    assert_eq!(store.get("missing").expect("get"), None);

    store.set(keys::PLAN_START_DATE, "2026-01-19").expect("set");
    store.set(keys::PLAN_START_DATE, "2026-02-02").expect("set");

    assert_eq!(store.len(), 1);
    assert_eq!(
        store.get(keys::PLAN_START_DATE).expect("get").as_deref(),
        Some("2026-02-02")
    );
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("plan.json");

    let store = FileStore::open(&path).expect("open");
    assert_eq!(store.path(), path.as_path());
    store.set(keys::COMPLETED_RIDES, r#"{"1-0":true}"#).expect("set");
    drop(store);

    let reopened = FileStore::open(&path).expect("reopen");
    assert_eq!(
        reopened.get(keys::COMPLETED_RIDES).expect("get").as_deref(),
        Some(r#"{"1-0":true}"#)
    );
}

#[test]
fn unreadable_data_file_opens_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plan.json");
    std::fs::write(&path, "this is not json").expect("write");

    let store = FileStore::open(&path).expect("open");
    assert_eq!(store.get(keys::COMPLETED_RIDES).expect("get"), None);
}

#[tokio::test]
async fn file_backed_state_persists_across_restarts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = Config::default();
    config.data_file = Some(dir.path().join("plan.json"));

    let app = century_plan::app(AppState::new(config.clone()).expect("state"));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/workouts/3/5/complete")
                .method("POST")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let restarted = century_plan::app(AppState::new(config).expect("state"));
    let response = restarted
        .oneshot(
            Request::builder()
                .uri("/api/plan")
                .method("GET")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let body: Value = serde_json::from_slice(&bytes).expect("json");

    assert_eq!(body["weeks"][2]["days"][5]["record"]["completed"], json!(true));
}

#[test]
fn injected_store_is_used_by_state() {
    let store = Arc::new(MemoryStore::new());
    store.set(keys::CELEBRATED_MILESTONES, r#"{"30":true,"40":true}"#).expect("set");

    let state = AppState::with_store(Config::default(), store.clone()).expect("state");
    let tracker = state.tracker().try_lock().expect("unlocked");
    assert_eq!(tracker.celebrated().len(), 2);
    assert!(store.get(keys::PLAN_START_DATE).expect("get").is_some());
}

#[test]
fn failed_flush_keeps_entries_in_step_with_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let parent = dir.path().join("data");
    let path = parent.join("plan.json");

    let store = FileStore::open(&path).expect("open");
    store.set(keys::COMPLETED_RIDES, r#"{"1-0":true}"#).expect("set");

    std::fs::remove_dir_all(&parent).expect("remove data dir");
    std::fs::write(&parent, "not a directory").expect("block data dir");

    assert!(store.set(keys::COMPLETED_RIDES, r#"{"1-0":true,"1-1":true}"#).is_err());
    assert!(store.set(keys::SKIPPED_RIDES, "{}").is_err());
    assert_eq!(
        store.get(keys::COMPLETED_RIDES).expect("get").as_deref(),
        Some(r#"{"1-0":true}"#)
    );
    assert_eq!(store.get(keys::SKIPPED_RIDES).expect("get"), None);
}
