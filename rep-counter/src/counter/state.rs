//! Per-session counting state
//!
//! Built in full when a session starts, so every field the counting routine
//! touches exists from the first frame on.

use serde::{Deserialize, Serialize};

use super::phase::{Phase, PhaseMachine};
use crate::config::EngineConfig;
use crate::kinematics::{AngleSmoother, RepDebounce};
use crate::profile::ExerciseProfile;
use crate::skeleton::Side;

/// Smoothing and latch for one limb
#[derive(Clone, Debug)]
pub(crate) struct SideTrack {
    pub smoother: AngleSmoother,
    /// Independent latch, used by alternating exercises
    pub machine: PhaseMachine,
    /// Last smoothed angle of this side
    pub angle: Option<f32>,
}

impl SideTrack {
    /// Smooth a raw angle and remember it
    pub fn smooth(&mut self, raw: f32) -> f32 {
        let smoothed = self.smoother.update(raw);
        self.angle = Some(smoothed);
        smoothed
    }
}

/// Mutable state of one counting session
#[derive(Clone, Debug)]
pub struct CounterState {
    pub(crate) count: u32,
    /// Display phase
    pub(crate) phase: Phase,
    /// Shared machine for bilateral and single-side exercises
    pub(crate) machine: PhaseMachine,
    pub(crate) sides: [SideTrack; 2],
    pub(crate) debounce: RepDebounce,
    /// Side that completed the last counted alternating rep
    pub(crate) last_rep_side: Option<Side>,
    /// Side the display angle belongs to
    pub(crate) active_side: Option<Side>,
    pub(crate) side_counts: [u32; 2],
    /// Display angle of the last processed frame
    pub(crate) angle: Option<f32>,
    /// Net count change made by hand
    pub(crate) manual_adjustments: i64,
}

impl CounterState {
    pub fn new(profile: &ExerciseProfile, config: &EngineConfig) -> Self {
        let track = SideTrack {
            smoother: AngleSmoother::from_config(config),
            machine: PhaseMachine::new(profile.thresholds),
            angle: None,
        };
        Self {
            count: 0,
            phase: Phase::Idle,
            machine: PhaseMachine::new(profile.thresholds),
            sides: [track.clone(), track],
            debounce: RepDebounce::new(config.debounce_secs),
            last_rep_side: None,
            active_side: None,
            side_counts: [0, 0],
            angle: None,
            manual_adjustments: 0,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn angle(&self) -> Option<f32> {
        self.angle
    }

    pub fn active_side(&self) -> Option<Side> {
        self.active_side
    }

    /// Reps attributed to each side (alternating and single-side exercises)
    pub fn side_count(&self, side: Side) -> u32 {
        self.side_counts[side.index()]
    }

    pub fn last_rep_time(&self) -> Option<f64> {
        self.debounce.last_rep()
    }

    pub fn manual_adjustments(&self) -> i64 {
        self.manual_adjustments
    }

    pub(crate) fn side(&self, side: Side) -> &SideTrack {
        &self.sides[side.index()]
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut SideTrack {
        &mut self.sides[side.index()]
    }
}

/// Copy of the public counter state for readers outside the inference path
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub exercise: Option<String>,
    pub count: u32,
    pub phase: Phase,
    pub angle: Option<f32>,
    pub active_side: Option<Side>,
    pub left_count: u32,
    pub right_count: u32,
    pub manual_adjustments: i64,
}
