pub mod celebration;
pub mod health;
pub mod plan;
pub mod progress;
pub mod workouts;
