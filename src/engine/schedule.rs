use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::engine::calendar;
use crate::types::plan::{WeekPlan, WorkoutKey};
use crate::types::progress::{DayStatus, DayView, WeekView};
use crate::types::record::WorkoutRecord;

/// Pins each planned day to the calendar and attaches its record.
pub fn build_week_views(
    plan: &[WeekPlan],
    records: &BTreeMap<WorkoutKey, WorkoutRecord>,
    start_date: NaiveDate,
    today: NaiveDate,
) -> Vec<WeekView> {
    plan.iter()
        .map(|week| {
            let (first_day, last_day) = calendar::week_range(start_date, week.week_num);
            let days = week
                .days
                .iter()
                .map(|day| {
                    let key = day.key();
                    let record = records.get(&key).copied().unwrap_or_default();
                    let date = calendar::date_for(start_date, day.week_num, day.day_index);
                    let status = calendar::classify(date, today);
                    DayView {
                        key,
                        spec: day.clone(),
                        date,
                        status,
                        missed: status == DayStatus::Past
                            && day.kind.is_ride()
                            && !record.completed
                            && !record.skipped,
                        record,
                        display_miles: record.effective_miles(day.planned_distance),
                    }
                })
                .collect();

            WeekView {
                week_num: week.week_num,
                first_day,
                last_day,
                date_label: calendar::week_range_label(start_date, week.week_num),
                total_planned_miles: week.total_planned_miles,
                days,
            }
        })
        .collect()
}
