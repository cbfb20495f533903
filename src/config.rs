use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;

use crate::types::plan::PlanConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// JSON file backing the tracker; in-memory when unset.
    pub data_file: Option<PathBuf>,
    /// Overrides the persisted start date when set.
    pub plan_start_date: Option<NaiveDate>,
    pub celebration_ttl: Duration,
    pub plan: PlanConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            data_file: None,
            plan_start_date: None,
            celebration_ttl: Duration::from_secs(4),
            plan: PlanConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env_parse("PORT").unwrap_or(defaults.port);

        let data_file = std::env::var("DATA_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let plan_start_date = std::env::var("PLAN_START_DATE")
            .ok()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());

        let celebration_seconds = env_parse("CELEBRATION_SECONDS").unwrap_or(4);

        let base = defaults.plan;
        let plan = PlanConfig {
            start_date: plan_start_date.unwrap_or(base.start_date),
            start_long_ride_miles: env_parse("START_LONG_RIDE_MILES")
                .unwrap_or(base.start_long_ride_miles),
            weekly_increase_miles: env_parse("WEEKLY_INCREASE_MILES")
                .unwrap_or(base.weekly_increase_miles),
            num_weeks: env_parse("NUM_WEEKS").unwrap_or(base.num_weeks),
            base_easy_miles: env_parse("BASE_EASY_MILES").unwrap_or(base.base_easy_miles),
            medium_ride_cap_miles: env_parse("MEDIUM_RIDE_CAP_MILES")
                .unwrap_or(base.medium_ride_cap_miles),
            final_long_ride_miles: env_parse("FINAL_LONG_RIDE_MILES")
                .unwrap_or(base.final_long_ride_miles),
        };

        Self {
            port,
            data_file,
            plan_start_date,
            celebration_ttl: Duration::from_secs(celebration_seconds),
            plan,
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}
