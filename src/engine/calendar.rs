//! Calendar mapping for the plan.
//!
//! Every comparison works on calendar dates; time of day never matters. The
//! `*_on` helpers take an explicit `today` so callers can pin the clock, the
//! plain ones read the local date fresh on each call.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::types::plan::DAYS_PER_WEEK;
use crate::types::progress::DayStatus;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn date_for(start_date: NaiveDate, week_num: u32, day_index: u8) -> NaiveDate {
    let offset = i64::from(week_num.saturating_sub(1)) * i64::from(DAYS_PER_WEEK)
        + i64::from(day_index);
    start_date + Duration::days(offset)
}

pub fn classify(date: NaiveDate, today: NaiveDate) -> DayStatus {
    match date.cmp(&today) {
        std::cmp::Ordering::Less => DayStatus::Past,
        std::cmp::Ordering::Equal => DayStatus::Today,
        std::cmp::Ordering::Greater => DayStatus::Future,
    }
}

pub fn is_past(date: NaiveDate) -> bool {
    classify(date, today()) == DayStatus::Past
}

pub fn is_today(date: NaiveDate) -> bool {
    classify(date, today()) == DayStatus::Today
}

pub fn is_future(date: NaiveDate) -> bool {
    classify(date, today()) == DayStatus::Future
}

/// 1-based week containing `today`, or `None` before the start or after the last week.
pub fn current_week_on(start_date: NaiveDate, num_weeks: u32, today: NaiveDate) -> Option<u32> {
    let days_since_start = (today - start_date).num_days();
    if days_since_start < 0 {
        return None;
    }
    let week = days_since_start / i64::from(DAYS_PER_WEEK) + 1;
    u32::try_from(week)
        .ok()
        .filter(|week| (1..=num_weeks).contains(week))
}

pub fn current_week(start_date: NaiveDate, num_weeks: u32) -> Option<u32> {
    current_week_on(start_date, num_weeks, today())
}

pub fn week_range(start_date: NaiveDate, week_num: u32) -> (NaiveDate, NaiveDate) {
    (
        date_for(start_date, week_num, 0),
        date_for(start_date, week_num, DAYS_PER_WEEK - 1),
    )
}

/// Short `M/D - M/D` label for a week.
pub fn week_range_label(start_date: NaiveDate, week_num: u32) -> String {
    let (first, last) = week_range(start_date, week_num);
    format!("{} - {}", short_date(first), short_date(last))
}

pub fn short_date(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// True once the week's last day is behind `today`.
pub fn is_week_in_past_on(start_date: NaiveDate, week_num: u32, today: NaiveDate) -> bool {
    let (_, last) = week_range(start_date, week_num);
    last < today
}
