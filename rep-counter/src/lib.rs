//! Rep Counter - exercise repetition counting from 2D pose keypoints
//!
//! Consumes one COCO-17 skeleton per frame and emits a rep count, a phase
//! label and, through the optional quality layer, a per-rep form score.
//!
//! Only contains:
//! - Module declarations and re-exports
//! - wasm_bindgen start hook (feature `wasm`)
//!
//! ```
//! use rep_counter::{ExerciseCounter, Phase, Skeleton};
//!
//! let mut counter = ExerciseCounter::new();
//! let frame = Skeleton::default(); // nothing detected
//! assert_eq!(counter.process_at("squat", &frame, 0.0).unwrap(), None);
//! assert_eq!(counter.counter(), 0);
//! assert_eq!(counter.phase(), Phase::Idle);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod error;
pub mod skeleton;
pub mod kinematics;
pub mod profile;
pub mod counter;
pub mod quality;

#[cfg(feature = "wasm")]
mod bridge;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use skeleton::{Landmark, Side, Skeleton};
pub use kinematics::{joint_angle, AngleSmoother, Clock, ManualClock, MonotonicClock, RepDebounce};
pub use profile::{CountingMode, ExerciseProfile, ProfileRegistry, Thresholds, Zone};
pub use counter::{CounterSnapshot, ExerciseCounter, Phase};
pub use quality::{FormCheck, FormQualityAnalyzer, QualityReport};

#[cfg(feature = "wasm")]
pub use bridge::*;

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[cfg(feature = "wasm")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"rep counter ready".into());
}
