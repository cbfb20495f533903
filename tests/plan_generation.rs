use century_plan::engine::generate::generate_plan;
use century_plan::error::TrackerError;
use century_plan::types::plan::{PlanConfig, WorkoutKind, MAX_PLAN_WEEKS};

#[test]
fn first_week_totals_ninety_miles() {
    let plan = generate_plan(&PlanConfig::default());
    let week = &plan[0];

    assert_eq!(week.week_num, 1);
    let distances: Vec<f64> = week.days.iter().map(|d| d.planned_distance).collect();
    assert_eq!(distances, vec![12.0, 12.0, 12.0, 12.0, 12.0, 30.0, 0.0]);
    assert_eq!(week.total_planned_miles, 90.0);
}

#[test]
fn final_week_uses_final_long_ride_and_capped_medium() {
    let plan = generate_plan(&PlanConfig::default());
    assert_eq!(plan.len(), 13);

    let last = plan.last().expect("final week");
    assert_eq!(last.week_num, 13);
    assert_eq!(last.day(1).expect("tue").planned_distance, 20.0);
    assert_eq!(last.day(5).expect("sat").planned_distance, 100.0);
    assert_eq!(last.total_planned_miles, 176.0);
}

#[test]
fn long_ride_grows_weekly_until_final_week() {
    let plan = generate_plan(&PlanConfig::default());
    let long_rides: Vec<f64> = plan
        .iter()
        .map(|week| week.day(5).expect("sat").planned_distance)
        .collect();

    assert_eq!(
        long_rides,
        vec![30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0, 80.0, 85.0, 100.0]
    );
}

#[test]
fn medium_ride_caps_at_twenty() {
    let plan = generate_plan(&PlanConfig::default());
    let mediums: Vec<f64> = plan
        .iter()
        .take(6)
        .map(|week| week.day(3).expect("thu").planned_distance)
        .collect();

    assert_eq!(mediums, vec![12.0, 14.0, 16.0, 18.0, 20.0, 20.0]);
}

#[test]
fn day_layout_is_fixed() {
    let plan = generate_plan(&PlanConfig::default());
    for week in &plan {
        let kinds: Vec<WorkoutKind> = week.days.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                WorkoutKind::Easy,
                WorkoutKind::Medium,
                WorkoutKind::Easy,
                WorkoutKind::Medium,
                WorkoutKind::Easy,
                WorkoutKind::Long,
                WorkoutKind::Rest,
            ]
        );
        let labels: Vec<&str> = week.days.iter().map(|d| d.label).collect();
        assert_eq!(labels, vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
        assert_eq!(week.rides().count(), 6);
    }
}

#[test]
fn generation_is_deterministic_and_ignores_start_date() {
    let config = PlanConfig::default();
    assert_eq!(generate_plan(&config), generate_plan(&config));

    let moved = config.with_start_date(chrono::NaiveDate::from_ymd_opt(2030, 6, 3).expect("date"));
    assert_eq!(generate_plan(&config), generate_plan(&moved));
}

#[test]
fn single_week_plan_is_the_final_week() {
    let config = PlanConfig {
        num_weeks: 1,
        ..PlanConfig::default()
    };
    let plan = generate_plan(&config);

    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].day(5).expect("sat").planned_distance, 100.0);
}

#[test]
fn validate_rejects_empty_plan_and_negative_distances() {
    let empty = PlanConfig {
        num_weeks: 0,
        ..PlanConfig::default()
    };
    assert!(matches!(empty.validate(), Err(TrackerError::InvalidPlanConfig(_))));

    let negative = PlanConfig {
        base_easy_miles: -1.0,
        ..PlanConfig::default()
    };
    assert!(matches!(negative.validate(), Err(TrackerError::InvalidPlanConfig(_))));

    assert!(PlanConfig::default().validate().is_ok());
}

#[test]
fn validate_caps_plan_length() {
    let longest = PlanConfig {
        num_weeks: MAX_PLAN_WEEKS,
        ..PlanConfig::default()
    };
    assert!(longest.validate().is_ok());

    for num_weeks in [MAX_PLAN_WEEKS + 1, 4_000_000_000] {
        let too_long = PlanConfig {
            num_weeks,
            ..PlanConfig::default()
        };
        assert!(matches!(too_long.validate(), Err(TrackerError::InvalidPlanConfig(_))));
    }
}
