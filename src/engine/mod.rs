pub mod calendar;
pub mod celebration;
pub mod generate;
pub mod milestone;
pub mod progress;
pub mod schedule;
pub mod tracker;
