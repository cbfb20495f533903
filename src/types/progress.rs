use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::plan::{WorkoutKey, WorkoutSpec};
use crate::types::record::WorkoutRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Past,
    Today,
    Future,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalProgress {
    pub total_goal: f64,
    pub total_completed: f64,
    pub total_rides: u32,
    pub completed_rides: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekStats {
    pub completed: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekProgress {
    pub week_num: u32,
    pub planned_miles: f64,
    pub completed_miles: f64,
    /// Completed minus the full week's plan.
    pub variance: f64,
    pub expected_miles: f64,
    /// Completed minus what should have been ridden by today.
    pub on_pace_variance: f64,
    pub progress_percent: f64,
    pub stats: WeekStats,
    pub in_past: bool,
    pub is_current: bool,
}

/// Cumulative-mileage checkpoint on the overall progress bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMarker {
    pub miles: f64,
    pub position_percent: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub today: NaiveDate,
    pub current_week: Option<u32>,
    pub expected_miles_to_date: f64,
    pub totals: TotalProgress,
    /// Positive is ahead of schedule, negative behind.
    pub miles_variance: f64,
    pub overall_percent: f64,
    pub markers: Vec<DistanceMarker>,
    pub weeks: Vec<WeekProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub key: WorkoutKey,
    #[serde(flatten)]
    pub spec: WorkoutSpec,
    pub date: NaiveDate,
    pub status: DayStatus,
    pub missed: bool,
    pub record: WorkoutRecord,
    pub display_miles: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekView {
    pub week_num: u32,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub date_label: String,
    pub total_planned_miles: f64,
    pub days: Vec<DayView>,
}
