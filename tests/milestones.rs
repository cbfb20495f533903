use std::collections::BTreeSet;
use std::sync::Arc;

use century_plan::engine::milestone::{MilestoneDetector, MILESTONES};
use century_plan::engine::tracker::WorkoutTracker;
use century_plan::storage::{keys, KeyValueStore, MemoryStore};
use century_plan::types::plan::{PlanConfig, WorkoutKey};
use serde_json::{json, Value};

fn set(values: &[u32]) -> BTreeSet<u32> {
    values.iter().copied().collect()
}

fn tracker_with(store: Arc<MemoryStore>) -> WorkoutTracker {
    WorkoutTracker::load(PlanConfig::default(), store).expect("tracker")
}

#[test]
fn celebrates_lowest_uncelebrated_threshold_once() {
    let mut detector = MilestoneDetector::new();

    assert_eq!(detector.record(35.0), Some(30));
    assert_eq!(detector.celebrated(), &set(&[30]));

    assert_eq!(detector.record(55.0), Some(40));
    assert_eq!(detector.celebrated(), &set(&[30, 40]));

    assert_eq!(detector.record(55.0), Some(50));
    assert_eq!(detector.celebrated(), &set(&[30, 40, 50]));

    assert_eq!(detector.record(55.0), None);
    assert_eq!(detector.celebrated(), &set(&[30, 40, 50]));
}

#[test]
fn short_rides_never_celebrate() {
    let mut detector = MilestoneDetector::new();
    assert_eq!(detector.record(29.9), None);
    assert_eq!(detector.record(f64::NAN), None);
    assert!(detector.celebrated().is_empty());
}

#[test]
fn evaluate_does_not_record() {
    let detector = MilestoneDetector::from_celebrated([30, 40]);
    assert_eq!(detector.evaluate(100.0), Some(50));
    assert_eq!(detector.evaluate(100.0), Some(50));
    assert!(!detector.is_celebrated(50));
}

#[test]
fn restoring_ignores_unknown_thresholds() {
    let detector = MilestoneDetector::from_celebrated([30, 35, 90, 80]);
    assert_eq!(detector.celebrated(), &set(&[30, 80]));
    assert_eq!(MILESTONES.len(), 6);
}

#[test]
fn completing_a_long_ride_celebrates_its_distance() {
    let mut tracker = tracker_with(Arc::new(MemoryStore::new()));

    let update = tracker.mark_complete(WorkoutKey::new(1, 5)).expect("complete");
    assert_eq!(update.milestone, Some(30));

    tracker.clear_status(WorkoutKey::new(1, 5)).expect("clear");
    let again = tracker.mark_complete(WorkoutKey::new(1, 5)).expect("complete");
    assert_eq!(again.milestone, None);
    assert_eq!(tracker.celebrated(), &set(&[30]));
}

#[test]
fn logged_mileage_drives_the_milestone() {
    let mut tracker = tracker_with(Arc::new(MemoryStore::new()));
    let saturday = WorkoutKey::new(1, 5);

    tracker.set_actual_miles(saturday, 22.0).expect("miles");
    assert_eq!(tracker.mark_complete(saturday).expect("complete").milestone, None);

    let week_three = WorkoutKey::new(3, 5);
    tracker.set_actual_miles(week_three, 52.0).expect("miles");
    assert_eq!(tracker.mark_complete(week_three).expect("complete").milestone, Some(30));
}

#[test]
fn only_long_rides_are_evaluated() {
    let mut tracker = tracker_with(Arc::new(MemoryStore::new()));
    let tuesday = WorkoutKey::new(1, 1);

    tracker.set_actual_miles(tuesday, 45.0).expect("miles");
    assert_eq!(tracker.mark_complete(tuesday).expect("complete").milestone, None);
    assert!(tracker.celebrated().is_empty());
}

#[test]
fn skipping_never_celebrates() {
    let mut tracker = tracker_with(Arc::new(MemoryStore::new()));
    assert_eq!(tracker.mark_skipped(WorkoutKey::new(4, 5)).expect("skip").milestone, None);
    assert!(tracker.celebrated().is_empty());
}

#[test]
fn celebrated_set_survives_reload() {
    let store = Arc::new(MemoryStore::new());
    let mut tracker = tracker_with(store.clone());
    tracker.mark_complete(WorkoutKey::new(1, 5)).expect("complete");

    let raw = store.get(keys::CELEBRATED_MILESTONES).expect("get").expect("stored");
    let stored: Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(stored, json!({"30": true}));

    let mut reloaded = tracker_with(store);
    assert_eq!(reloaded.celebrated(), &set(&[30]));
    let update = reloaded.mark_complete(WorkoutKey::new(2, 5)).expect("complete");
    assert_eq!(update.milestone, None);
}

#[test]
fn completing_an_already_completed_ride_does_not_celebrate_again() {
    let store = Arc::new(MemoryStore::new());
    let mut tracker = tracker_with(store.clone());
    let week_six = WorkoutKey::new(6, 5);

    assert_eq!(tracker.mark_complete(week_six).expect("complete").milestone, Some(30));
    assert_eq!(tracker.mark_complete(week_six).expect("complete again").milestone, None);
    assert_eq!(tracker.mark_complete(week_six).expect("complete again").milestone, None);
    assert_eq!(tracker.celebrated(), &set(&[30]));

    let raw = store.get(keys::CELEBRATED_MILESTONES).expect("get").expect("stored");
    let stored: Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(stored, json!({"30": true}));
}
