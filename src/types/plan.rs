use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

pub const DAYS_PER_WEEK: u8 = 7;

/// Longest plan accepted: two years of weekly progression.
pub const MAX_PLAN_WEEKS: u32 = 104;

pub const DAY_LABELS: [&str; DAYS_PER_WEEK as usize] =
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// First Monday of the century build the tracker was written for.
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 19).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    pub start_date: NaiveDate,
    pub start_long_ride_miles: f64,
    pub weekly_increase_miles: f64,
    pub num_weeks: u32,
    pub base_easy_miles: f64,
    pub medium_ride_cap_miles: f64,
    pub final_long_ride_miles: f64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            start_long_ride_miles: 30.0,
            weekly_increase_miles: 5.0,
            num_weeks: 13,
            base_easy_miles: 12.0,
            medium_ride_cap_miles: 20.0,
            final_long_ride_miles: 100.0,
        }
    }
}

impl PlanConfig {
    pub fn with_start_date(&self, start_date: NaiveDate) -> Self {
        Self {
            start_date,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        if !(1..=MAX_PLAN_WEEKS).contains(&self.num_weeks) {
            return Err(TrackerError::InvalidPlanConfig(format!(
                "num_weeks must be between 1 and {}, got {}",
                MAX_PLAN_WEEKS, self.num_weeks
            )));
        }

        let distances = [
            ("start_long_ride_miles", self.start_long_ride_miles),
            ("weekly_increase_miles", self.weekly_increase_miles),
            ("base_easy_miles", self.base_easy_miles),
            ("medium_ride_cap_miles", self.medium_ride_cap_miles),
            ("final_long_ride_miles", self.final_long_ride_miles),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackerError::InvalidPlanConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Easy,
    Medium,
    Long,
    Rest,
}

impl WorkoutKind {
    pub fn is_ride(&self) -> bool {
        !matches!(self, WorkoutKind::Rest)
    }
}

/// Identity of a single workout: `(week_num, day_index)`, stored as `"{week}-{day}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkoutKey {
    pub week_num: u32,
    pub day_index: u8,
}

impl WorkoutKey {
    pub fn new(week_num: u32, day_index: u8) -> Self {
        Self {
            week_num,
            day_index,
        }
    }
}

impl fmt::Display for WorkoutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.week_num, self.day_index)
    }
}

impl FromStr for WorkoutKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (week, day) = s
            .split_once('-')
            .ok_or_else(|| format!("Malformed workout key: {}", s))?;
        let week_num = week
            .trim()
            .parse()
            .map_err(|_| format!("Malformed week in workout key: {}", s))?;
        let day_index = day
            .trim()
            .parse()
            .map_err(|_| format!("Malformed day in workout key: {}", s))?;
        Ok(Self::new(week_num, day_index))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutSpec {
    pub week_num: u32,
    pub day_index: u8,
    pub label: &'static str,
    pub planned_distance: f64,
    pub kind: WorkoutKind,
}

impl WorkoutSpec {
    pub fn key(&self) -> WorkoutKey {
        WorkoutKey::new(self.week_num, self.day_index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekPlan {
    pub week_num: u32,
    pub days: Vec<WorkoutSpec>,
    pub total_planned_miles: f64,
}

impl WeekPlan {
    pub fn day(&self, day_index: u8) -> Option<&WorkoutSpec> {
        self.days.get(day_index as usize)
    }

    /// Non-rest days, in week order.
    pub fn rides(&self) -> impl Iterator<Item = &WorkoutSpec> {
        self.days.iter().filter(|day| day.kind.is_ride())
    }
}
