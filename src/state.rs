use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::engine::celebration::CelebrationTimer;
use crate::engine::tracker::WorkoutTracker;
use crate::error::TrackerError;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    tracker: Arc<Mutex<WorkoutTracker>>,
    celebrations: CelebrationTimer,
}

impl AppState {
    /// Opens the configured store: the data file when set, otherwise memory.
    pub fn new(config: Config) -> Result<Self, TrackerError> {
        let store: Arc<dyn KeyValueStore> = match &config.data_file {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self, TrackerError> {
        let mut tracker = WorkoutTracker::load(config.plan.clone(), store)?;
        if let Some(start_date) = config.plan_start_date {
            if tracker.config().start_date != start_date {
                tracker.set_start_date(start_date)?;
            }
        }

        Ok(Self {
            celebrations: CelebrationTimer::new(config.celebration_ttl),
            config: Arc::new(config),
            tracker: Arc::new(Mutex::new(tracker)),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tracker(&self) -> &Mutex<WorkoutTracker> {
        &self.tracker
    }

    pub fn celebrations(&self) -> &CelebrationTimer {
        &self.celebrations
    }
}
