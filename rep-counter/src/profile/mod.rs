//! Profile module - data-driven exercise definitions
//!
//! Re-exports only. All logic in submodules.

mod zones;
mod exercise;
mod registry;

pub use zones::{Thresholds, Zone};
pub use exercise::{CountingMode, ExerciseProfile};
pub use registry::ProfileRegistry;
