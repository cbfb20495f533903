use crate::types::plan::{PlanConfig, WeekPlan, WorkoutKind, WorkoutSpec, DAY_LABELS};

/// Weekly growth of the medium ride until it reaches its cap.
const MEDIUM_RIDE_STEP_MILES: f64 = 2.0;

/// Builds the full progression. Distances depend only on the week index, never on the start date.
pub fn generate_plan(config: &PlanConfig) -> Vec<WeekPlan> {
    (0..config.num_weeks)
        .map(|week| build_week(config, week))
        .collect()
}

fn build_week(config: &PlanConfig, week: u32) -> WeekPlan {
    let w = f64::from(week);
    let long_ride = if week + 1 == config.num_weeks {
        config.final_long_ride_miles
    } else {
        config.start_long_ride_miles + w * config.weekly_increase_miles
    };
    let medium_ride =
        (config.base_easy_miles + w * MEDIUM_RIDE_STEP_MILES).min(config.medium_ride_cap_miles);
    let easy_ride = config.base_easy_miles;

    let layout = [
        (easy_ride, WorkoutKind::Easy),
        (medium_ride, WorkoutKind::Medium),
        (easy_ride, WorkoutKind::Easy),
        (medium_ride, WorkoutKind::Medium),
        (easy_ride, WorkoutKind::Easy),
        (long_ride, WorkoutKind::Long),
        (0.0, WorkoutKind::Rest),
    ];

    let week_num = week + 1;
    let days: Vec<WorkoutSpec> = layout
        .into_iter()
        .zip(DAY_LABELS)
        .enumerate()
        .map(|(idx, ((planned_distance, kind), label))| WorkoutSpec {
            week_num,
            day_index: idx as u8,
            label,
            planned_distance,
            kind,
        })
        .collect();
    let total_planned_miles = days.iter().map(|day| day.planned_distance).sum();

    WeekPlan {
        week_num,
        days,
        total_planned_miles,
    }
}
