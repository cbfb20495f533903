mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StorageError;

/// Keys of the persisted blobs.
pub mod keys {
    pub const COMPLETED_RIDES: &str = "completedRides";
    pub const SKIPPED_RIDES: &str = "skippedRides";
    pub const ACTUAL_MILEAGE: &str = "actualMileage";
    pub const CELEBRATED_MILESTONES: &str = "celebratedMilestones";
    pub const PLAN_START_DATE: &str = "planStartDate";
}

/// Durable string-keyed store the tracker writes through.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
