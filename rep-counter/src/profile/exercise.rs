//! Per-exercise geometry, thresholds and counting mode
//!
//! Profiles are plain data. Adding an exercise means adding a profile, not
//! writing a new counting function.

use serde::{Deserialize, Serialize};

use super::zones::Thresholds;
use crate::error::{EngineError, Result};
use crate::quality::FormCheck;
use crate::skeleton::{Side, LANDMARK_COUNT};

/// How left and right limbs combine into reps
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CountingMode {
    /// Both sides must be in a zone before the shared phase moves
    Bilateral,
    /// Mean of both sides must be in the zone; each side only needs to be
    /// within `tolerance` degrees of it
    BilateralAveraged { tolerance: f32 },
    /// Sides move out of phase; each has its own latch and the same side
    /// cannot complete two reps in a row
    Alternating,
    /// Only the named side is tracked
    SingleSide { side: Side },
}

impl CountingMode {
    /// Sides whose joint triplets the mode reads
    pub fn tracked_sides(self) -> &'static [Side] {
        match self {
            CountingMode::SingleSide { side: Side::Left } => &[Side::Left],
            CountingMode::SingleSide { side: Side::Right } => &[Side::Right],
            _ => &Side::BOTH,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CountingMode::Bilateral => "bilateral",
            CountingMode::BilateralAveraged { .. } => "bilateral_averaged",
            CountingMode::Alternating => "alternating",
            CountingMode::SingleSide { .. } => "single_side",
        }
    }
}

/// Immutable description of one exercise
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProfile {
    /// Identifier used by callers, e.g. "squat"
    pub id: String,
    /// (first, vertex, last) landmark indices on the left side
    #[serde(default)]
    pub left: Option<[usize; 3]>,
    /// (first, vertex, last) landmark indices on the right side
    #[serde(default)]
    pub right: Option<[usize; 3]>,
    #[serde(flatten)]
    pub thresholds: Thresholds,
    pub mode: CountingMode,
    /// Rough energy cost of one rep (kcal)
    #[serde(default)]
    pub kcal_per_rep: f32,
    /// Form checks run on each completed rep
    #[serde(default)]
    pub checks: Vec<FormCheck>,
}

impl ExerciseProfile {
    pub fn joints(&self, side: Side) -> Option<[usize; 3]> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::invalid_config("profile id must not be empty"));
        }
        self.thresholds
            .validate()
            .map_err(|e| EngineError::invalid_config(format!("{}: {e}", self.id)))?;

        for &side in self.mode.tracked_sides() {
            let joints = self.joints(side).ok_or_else(|| {
                EngineError::invalid_config(format!(
                    "{}: {} mode needs {} joints",
                    self.id,
                    self.mode.name(),
                    side.as_str()
                ))
            })?;
            if joints.iter().any(|&i| i >= LANDMARK_COUNT) {
                return Err(EngineError::invalid_config(format!(
                    "{}: landmark index out of range in {:?}",
                    self.id, joints
                )));
            }
            if joints[0] == joints[1] || joints[1] == joints[2] {
                return Err(EngineError::invalid_config(format!(
                    "{}: vertex repeated in {:?}",
                    self.id, joints
                )));
            }
        }

        if let CountingMode::BilateralAveraged { tolerance } = self.mode {
            if tolerance.is_nan() || tolerance < 0.0 {
                return Err(EngineError::invalid_config(format!(
                    "{}: tolerance must not be negative",
                    self.id
                )));
            }
        }
        if self.kcal_per_rep.is_nan() || self.kcal_per_rep < 0.0 {
            return Err(EngineError::invalid_config(format!(
                "{}: kcal_per_rep must not be negative",
                self.id
            )));
        }
        for check in &self.checks {
            check
                .validate()
                .map_err(|e| EngineError::invalid_config(format!("{}: {e}", self.id)))?;
        }
        Ok(())
    }
}
