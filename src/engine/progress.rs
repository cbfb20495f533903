use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::engine::calendar;
use crate::types::plan::{WeekPlan, WorkoutKey, WorkoutSpec};
use crate::types::progress::{
    DistanceMarker, ProgressSnapshot, TotalProgress, WeekProgress, WeekStats,
};
use crate::types::record::WorkoutRecord;

/// Cumulative distances flagged along the overall progress bar.
pub const DISTANCE_MARKERS: [f64; 5] = [100.0, 250.0, 500.0, 1000.0, 1500.0];

/// Read-only derivation of progress metrics for a fixed `today`.
pub struct ProgressCalculator<'a> {
    plan: &'a [WeekPlan],
    records: &'a BTreeMap<WorkoutKey, WorkoutRecord>,
    start_date: NaiveDate,
    today: NaiveDate,
}

impl<'a> ProgressCalculator<'a> {
    pub fn new(
        plan: &'a [WeekPlan],
        records: &'a BTreeMap<WorkoutKey, WorkoutRecord>,
        start_date: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        Self {
            plan,
            records,
            start_date,
            today,
        }
    }

    fn record(&self, day: &WorkoutSpec) -> WorkoutRecord {
        self.records.get(&day.key()).copied().unwrap_or_default()
    }

    fn has_arrived(&self, day: &WorkoutSpec) -> bool {
        calendar::date_for(self.start_date, day.week_num, day.day_index) <= self.today
    }

    fn is_completed(&self, day: &WorkoutSpec) -> bool {
        self.record(day).completed
    }

    /// Planned distance of every ride whose date has arrived, completed or not.
    pub fn expected_miles_to_date(&self) -> f64 {
        self.plan.iter().map(|week| self.week_expected_miles(week)).sum()
    }

    pub fn week_expected_miles(&self, week: &WeekPlan) -> f64 {
        week.rides()
            .filter(|day| self.has_arrived(day))
            .map(|day| day.planned_distance)
            .sum()
    }

    pub fn completed_miles(&self, week: &WeekPlan) -> f64 {
        week.rides()
            .filter(|day| self.is_completed(day))
            .map(|day| self.record(day).effective_miles(day.planned_distance))
            .sum()
    }

    pub fn total_progress(&self) -> TotalProgress {
        let mut totals = TotalProgress::default();
        for week in self.plan {
            for day in week.rides() {
                totals.total_goal += day.planned_distance;
                totals.total_rides += 1;
            }
            let stats = self.week_completion_stats(week);
            totals.completed_rides += stats.completed;
            totals.total_completed += self.completed_miles(week);
        }
        totals
    }

    pub fn miles_variance(&self) -> f64 {
        self.total_progress().total_completed - self.expected_miles_to_date()
    }

    /// Against the whole week's plan; meaningful once the week is over.
    pub fn week_variance(&self, week: &WeekPlan) -> f64 {
        self.completed_miles(week) - week.total_planned_miles
    }

    /// Against what should have been ridden so far; meaningful for the current week.
    pub fn on_pace_variance(&self, week: &WeekPlan) -> f64 {
        self.completed_miles(week) - self.week_expected_miles(week)
    }

    pub fn week_completion_stats(&self, week: &WeekPlan) -> WeekStats {
        WeekStats {
            completed: week.rides().filter(|day| self.is_completed(day)).count() as u32,
            total: week.rides().count() as u32,
        }
    }

    /// Share of rides completed, by count rather than mileage.
    pub fn week_progress_percent(&self, week: &WeekPlan) -> f64 {
        let stats = self.week_completion_stats(week);
        percent(f64::from(stats.completed), f64::from(stats.total))
    }

    pub fn overall_percent(&self) -> f64 {
        let totals = self.total_progress();
        percent(totals.total_completed, totals.total_goal)
    }

    pub fn is_week_in_past(&self, week: &WeekPlan) -> bool {
        calendar::is_week_in_past_on(self.start_date, week.week_num, self.today)
    }

    pub fn current_week(&self) -> Option<u32> {
        calendar::current_week_on(self.start_date, self.plan.len() as u32, self.today)
    }

    pub fn distance_markers(&self) -> Vec<DistanceMarker> {
        let totals = self.total_progress();
        DISTANCE_MARKERS
            .iter()
            .filter(|&&miles| miles <= totals.total_goal)
            .map(|&miles| DistanceMarker {
                miles,
                position_percent: percent(miles, totals.total_goal),
                passed: totals.total_completed >= miles,
            })
            .collect()
    }

    pub fn week_progress(&self, week: &WeekPlan) -> WeekProgress {
        let completed_miles = self.completed_miles(week);
        let expected_miles = self.week_expected_miles(week);
        WeekProgress {
            week_num: week.week_num,
            planned_miles: week.total_planned_miles,
            completed_miles,
            variance: completed_miles - week.total_planned_miles,
            expected_miles,
            on_pace_variance: completed_miles - expected_miles,
            progress_percent: self.week_progress_percent(week),
            stats: self.week_completion_stats(week),
            in_past: self.is_week_in_past(week),
            is_current: self.current_week() == Some(week.week_num),
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let totals = self.total_progress();
        let expected_miles_to_date = self.expected_miles_to_date();
        ProgressSnapshot {
            today: self.today,
            current_week: self.current_week(),
            expected_miles_to_date,
            totals,
            miles_variance: totals.total_completed - expected_miles_to_date,
            overall_percent: percent(totals.total_completed, totals.total_goal),
            markers: self.distance_markers(),
            weeks: self.plan.iter().map(|week| self.week_progress(week)).collect(),
        }
    }
}

/// `part / whole * 100`, or 0 when there is nothing to measure against.
fn percent(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    part / whole * 100.0
}
