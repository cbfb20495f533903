use serde::{Deserialize, Serialize};

/// Mutable per-workout state. `completed` and `skipped` are never both set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub completed: bool,
    pub skipped: bool,
    pub actual_miles: Option<f64>,
}

impl WorkoutRecord {
    /// Logged mileage if present, otherwise the plan's distance.
    pub fn effective_miles(&self, planned_distance: f64) -> f64 {
        self.actual_miles.unwrap_or(planned_distance)
    }
}
