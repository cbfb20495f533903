use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;

use crate::engine::generate::generate_plan;
use crate::engine::milestone::MilestoneDetector;
use crate::engine::progress::ProgressCalculator;
use crate::error::{StorageError, TrackerError};
use crate::storage::{keys, KeyValueStore};
use crate::types::plan::{PlanConfig, WeekPlan, WorkoutKey, WorkoutKind, WorkoutSpec};
use crate::types::progress::ProgressSnapshot;
use crate::types::record::WorkoutRecord;

/// Result of a single mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkoutUpdate {
    pub key: WorkoutKey,
    pub record: WorkoutRecord,
    /// Threshold newly celebrated by this call, if any.
    pub milestone: Option<u32>,
}

/// Owns workout records and milestone state, writing every change through the store.
pub struct WorkoutTracker {
    config: PlanConfig,
    plan: Vec<WeekPlan>,
    records: BTreeMap<WorkoutKey, WorkoutRecord>,
    milestones: MilestoneDetector,
    store: Arc<dyn KeyValueStore>,
}

impl WorkoutTracker {
    /// Restores state from `store`. A persisted start date takes precedence over
    /// `config.start_date`; unreadable blobs load as empty.
    pub fn load(config: PlanConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, TrackerError> {
        config.validate()?;

        let persisted_start = store
            .get(keys::PLAN_START_DATE)?
            .and_then(|raw| parse_start_date(&raw));
        let config = match persisted_start {
            Some(start_date) => config.with_start_date(start_date),
            None => {
                store.set(keys::PLAN_START_DATE, &encode_start_date(config.start_date))?;
                config
            }
        };

        let completed = load_flags(store.as_ref(), keys::COMPLETED_RIDES)?;
        let skipped = load_flags(store.as_ref(), keys::SKIPPED_RIDES)?;
        let mileage = load_mileage(store.as_ref())?;
        let celebrated = load_celebrated(store.as_ref())?;

        let plan = generate_plan(&config);
        let mut records: BTreeMap<WorkoutKey, WorkoutRecord> = BTreeMap::new();
        for key in completed {
            records.entry(key).or_default().completed = true;
        }
        for key in skipped {
            let record = records.entry(key).or_default();
            if record.completed {
                tracing::warn!("Workout {} stored as both completed and skipped; keeping completed", key);
                continue;
            }
            record.skipped = true;
        }
        for (key, miles) in mileage {
            records.entry(key).or_default().actual_miles = Some(miles);
        }
        for (key, record) in records.iter_mut() {
            let is_rest = find_spec(&plan, *key).map(|spec| spec.kind == WorkoutKind::Rest);
            if is_rest == Some(true) && (record.completed || record.skipped) {
                tracing::warn!("Dropping status stored for rest day {}", key);
                record.completed = false;
                record.skipped = false;
            }
        }

        tracing::info!(
            "Loaded plan starting {} ({} weeks, {} tracked workouts, {} milestones celebrated)",
            config.start_date,
            config.num_weeks,
            records.len(),
            celebrated.len()
        );

        Ok(Self {
            config,
            plan,
            records,
            milestones: MilestoneDetector::from_celebrated(celebrated),
            store,
        })
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn plan(&self) -> &[WeekPlan] {
        &self.plan
    }

    pub fn records(&self) -> &BTreeMap<WorkoutKey, WorkoutRecord> {
        &self.records
    }

    pub fn record(&self, key: WorkoutKey) -> WorkoutRecord {
        self.records.get(&key).copied().unwrap_or_default()
    }

    pub fn celebrated(&self) -> &BTreeSet<u32> {
        self.milestones.celebrated()
    }

    pub fn spec(&self, key: WorkoutKey) -> Result<&WorkoutSpec, TrackerError> {
        find_spec(&self.plan, key).ok_or(TrackerError::OutOfRangeKey(key))
    }

    pub fn progress(&self, today: NaiveDate) -> ProgressSnapshot {
        ProgressCalculator::new(&self.plan, &self.records, self.config.start_date, today).snapshot()
    }

    /// Completes the workout. A long ride that was not already completed is
    /// checked against the milestone thresholds.
    pub fn mark_complete(&mut self, key: WorkoutKey) -> Result<WorkoutUpdate, TrackerError> {
        let spec = self.trackable_spec(key)?.clone();
        let previous = self.record(key);
        let record = WorkoutRecord {
            completed: true,
            skipped: false,
            ..previous
        };

        let mut milestones = self.milestones.clone();
        let milestone = if spec.kind == WorkoutKind::Long && !previous.completed {
            milestones.record(record.effective_miles(spec.planned_distance))
        } else {
            None
        };

        let mut blobs = vec![Blob::Completed, Blob::Skipped];
        if milestone.is_some() {
            blobs.push(Blob::Milestones);
        }
        self.commit(key, record, milestones, &blobs)?;

        tracing::info!("Marked workout {} complete", key);
        Ok(WorkoutUpdate {
            key,
            record,
            milestone,
        })
    }

    pub fn mark_skipped(&mut self, key: WorkoutKey) -> Result<WorkoutUpdate, TrackerError> {
        self.trackable_spec(key)?;
        let record = WorkoutRecord {
            completed: false,
            skipped: true,
            ..self.record(key)
        };
        self.commit(key, record, self.milestones.clone(), &[Blob::Completed, Blob::Skipped])?;

        tracing::info!("Marked workout {} skipped", key);
        Ok(WorkoutUpdate {
            key,
            record,
            milestone: None,
        })
    }

    pub fn clear_status(&mut self, key: WorkoutKey) -> Result<WorkoutUpdate, TrackerError> {
        self.spec(key)?;
        let record = WorkoutRecord {
            completed: false,
            skipped: false,
            ..self.record(key)
        };
        self.commit(key, record, self.milestones.clone(), &[Blob::Completed, Blob::Skipped])?;

        tracing::info!("Cleared status of workout {}", key);
        Ok(WorkoutUpdate {
            key,
            record,
            milestone: None,
        })
    }

    /// Stores a mileage override; completion flags are left alone.
    pub fn set_actual_miles(&mut self, key: WorkoutKey, miles: f64) -> Result<WorkoutUpdate, TrackerError> {
        self.spec(key)?;
        let miles = validate_miles(miles)?;
        let record = WorkoutRecord {
            actual_miles: Some(miles),
            ..self.record(key)
        };
        self.commit(key, record, self.milestones.clone(), &[Blob::Mileage])?;

        tracing::info!("Logged {} mi for workout {}", miles, key);
        Ok(WorkoutUpdate {
            key,
            record,
            milestone: None,
        })
    }

    /// Completes the workout, or clears it when it is already completed.
    pub fn toggle_complete(&mut self, key: WorkoutKey) -> Result<WorkoutUpdate, TrackerError> {
        if self.record(key).completed {
            self.clear_status(key)
        } else {
            self.mark_complete(key)
        }
    }

    /// Skips the workout, or clears it when it is already skipped.
    pub fn toggle_skipped(&mut self, key: WorkoutKey) -> Result<WorkoutUpdate, TrackerError> {
        if self.record(key).skipped {
            self.clear_status(key)
        } else {
            self.mark_skipped(key)
        }
    }

    /// Moves the plan on the calendar. Distances are unaffected.
    pub fn set_start_date(&mut self, start_date: NaiveDate) -> Result<(), TrackerError> {
        self.store
            .set(keys::PLAN_START_DATE, &encode_start_date(start_date))?;
        self.config = self.config.with_start_date(start_date);
        self.plan = generate_plan(&self.config);
        tracing::info!("Plan start date set to {}", start_date);
        Ok(())
    }

    fn trackable_spec(&self, key: WorkoutKey) -> Result<&WorkoutSpec, TrackerError> {
        let spec = self.spec(key)?;
        if spec.kind == WorkoutKind::Rest {
            return Err(TrackerError::RestDayNotTrackable(key));
        }
        Ok(spec)
    }

    /// Writes `blobs` from the staged state, then adopts it. Nothing changes in
    /// memory if a write fails, and blobs already written are put back.
    fn commit(
        &mut self,
        key: WorkoutKey,
        record: WorkoutRecord,
        milestones: MilestoneDetector,
        blobs: &[Blob],
    ) -> Result<(), TrackerError> {
        let mut records = self.records.clone();
        records.insert(key, record);

        for (idx, blob) in blobs.iter().enumerate() {
            let written = blob
                .encode(&records, &milestones)
                .and_then(|value| self.store.set(blob.key(), &value).map_err(TrackerError::from));
            if let Err(err) = written {
                self.restore(&blobs[..idx]);
                return Err(err);
            }
        }

        self.records = records;
        self.milestones = milestones;
        Ok(())
    }

    fn restore(&self, blobs: &[Blob]) {
        for blob in blobs {
            let restored = blob
                .encode(&self.records, &self.milestones)
                .and_then(|value| self.store.set(blob.key(), &value).map_err(TrackerError::from));
            if let Err(err) = restored {
                tracing::warn!("Failed to restore {} after a failed write: {}", blob.key(), err);
            }
        }
    }
}

/// Persisted blobs derived from tracker state.
#[derive(Debug, Clone, Copy)]
enum Blob {
    Completed,
    Skipped,
    Mileage,
    Milestones,
}

impl Blob {
    fn key(self) -> &'static str {
        match self {
            Blob::Completed => keys::COMPLETED_RIDES,
            Blob::Skipped => keys::SKIPPED_RIDES,
            Blob::Mileage => keys::ACTUAL_MILEAGE,
            Blob::Milestones => keys::CELEBRATED_MILESTONES,
        }
    }

    fn encode(
        self,
        records: &BTreeMap<WorkoutKey, WorkoutRecord>,
        milestones: &MilestoneDetector,
    ) -> Result<String, TrackerError> {
        let encoded = match self {
            Blob::Completed => serde_json::to_string(&flags(records, |record| record.completed)),
            Blob::Skipped => serde_json::to_string(&flags(records, |record| record.skipped)),
            Blob::Mileage => {
                let mileage: BTreeMap<String, f64> = records
                    .iter()
                    .filter_map(|(key, record)| {
                        record.actual_miles.map(|miles| (key.to_string(), miles))
                    })
                    .collect();
                serde_json::to_string(&mileage)
            }
            Blob::Milestones => {
                let celebrated: BTreeMap<String, bool> = milestones
                    .celebrated()
                    .iter()
                    .map(|m| (m.to_string(), true))
                    .collect();
                serde_json::to_string(&celebrated)
            }
        };
        Ok(encoded.map_err(StorageError::from)?)
    }
}

fn flags(
    records: &BTreeMap<WorkoutKey, WorkoutRecord>,
    is_set: impl Fn(&WorkoutRecord) -> bool,
) -> BTreeMap<String, bool> {
    records
        .iter()
        .filter(|(_, record)| is_set(record))
        .map(|(key, _)| (key.to_string(), true))
        .collect()
}

fn find_spec(plan: &[WeekPlan], key: WorkoutKey) -> Option<&WorkoutSpec> {
    plan.iter()
        .find(|week| week.week_num == key.week_num)?
        .day(key.day_index)
}

/// Parses user-entered mileage. Anything that is not a finite, non-negative number is rejected.
pub fn parse_miles(input: &str) -> Result<f64, TrackerError> {
    let trimmed = input.trim();
    let miles: f64 = trimmed
        .parse()
        .map_err(|_| TrackerError::InvalidMileageInput(format!("'{}' is not a number", input)))?;
    validate_miles(miles)
}

pub fn validate_miles(miles: f64) -> Result<f64, TrackerError> {
    if !miles.is_finite() {
        return Err(TrackerError::InvalidMileageInput(format!(
            "{} is not a finite number",
            miles
        )));
    }
    if miles < 0.0 {
        return Err(TrackerError::InvalidMileageInput(format!(
            "{} is negative",
            miles
        )));
    }
    Ok(miles)
}

/// Local midnight of `date` as an RFC 3339 UTC timestamp.
pub fn encode_start_date(date: NaiveDate) -> String {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let utc = midnight
        .and_local_timezone(Local)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc());
    utc.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts an RFC 3339 timestamp (read in local time) or a bare `YYYY-MM-DD`.
pub fn parse_start_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim().trim_matches('"');
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Local).date_naive());
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::warn!("Ignoring unreadable plan start date '{}': {}", raw, err);
            None
        }
    }
}

fn read_blob<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, TrackerError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            tracing::warn!("Stored {} is corrupt, starting empty: {}", key, err);
            Ok(None)
        }
    }
}

fn parse_key(raw: &str, blob: &str) -> Option<WorkoutKey> {
    match raw.parse() {
        Ok(key) => Some(key),
        Err(err) => {
            tracing::warn!("Skipping entry in {}: {}", blob, err);
            None
        }
    }
}

fn load_flags(store: &dyn KeyValueStore, blob: &str) -> Result<Vec<WorkoutKey>, TrackerError> {
    let flags: HashMap<String, serde_json::Value> = read_blob(store, blob)?.unwrap_or_default();
    Ok(flags
        .iter()
        .filter(|(_, value)| value.as_bool() == Some(true))
        .filter_map(|(raw, _)| parse_key(raw, blob))
        .collect())
}

fn load_mileage(store: &dyn KeyValueStore) -> Result<Vec<(WorkoutKey, f64)>, TrackerError> {
    let mileage: HashMap<String, serde_json::Value> =
        read_blob(store, keys::ACTUAL_MILEAGE)?.unwrap_or_default();
    Ok(mileage
        .iter()
        .filter_map(|(raw, value)| {
            let key = parse_key(raw, keys::ACTUAL_MILEAGE)?;
            match value.as_f64().map(validate_miles) {
                Some(Ok(miles)) => Some((key, miles)),
                _ => {
                    tracing::warn!("Dropping unusable mileage {} for workout {}", value, key);
                    None
                }
            }
        })
        .collect())
}

fn load_celebrated(store: &dyn KeyValueStore) -> Result<Vec<u32>, TrackerError> {
    let celebrated: HashMap<String, serde_json::Value> =
        read_blob(store, keys::CELEBRATED_MILESTONES)?.unwrap_or_default();
    Ok(celebrated
        .iter()
        .filter(|(_, value)| value.as_bool() == Some(true))
        .filter_map(|(raw, _)| raw.trim().parse().ok())
        .collect())
}
