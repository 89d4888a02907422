//! Angle zones and hysteresis thresholds
//!
//! A phase is entered only when the smoothed angle is inside that phase's
//! zone. The two zones never touch, so an angle hovering near one cutoff
//! cannot flip the phase back and forth.

use serde::{Deserialize, Serialize};

use crate::counter::Phase;
use crate::error::{EngineError, Result};

/// One side of an angle cutoff
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Strictly below the cutoff (degrees)
    Below(f32),
    /// Strictly above the cutoff (degrees)
    Above(f32),
}

impl Zone {
    pub fn cutoff(self) -> f32 {
        match self {
            Zone::Below(c) | Zone::Above(c) => c,
        }
    }

    pub fn contains(self, angle: f32) -> bool {
        match self {
            Zone::Below(c) => angle < c,
            Zone::Above(c) => angle > c,
        }
    }

    /// Inside the zone once the cutoff is relaxed by `tolerance` degrees
    pub fn contains_within(self, angle: f32, tolerance: f32) -> bool {
        match self {
            Zone::Below(c) => angle < c + tolerance,
            Zone::Above(c) => angle > c - tolerance,
        }
    }
}

/// Up/down zones of one exercise plus the phase whose entry completes a rep
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub down: Zone,
    pub up: Zone,
    /// Entering this phase from the opposite one completes a rep
    pub count_on: Phase,
}

impl Thresholds {
    pub fn new(down: Zone, up: Zone, count_on: Phase) -> Self {
        Self { down, up, count_on }
    }

    /// Phase whose zone holds `angle`; None inside the dead band
    pub fn classify(&self, angle: f32) -> Option<Phase> {
        if self.down.contains(angle) {
            Some(Phase::Down)
        } else if self.up.contains(angle) {
            Some(Phase::Up)
        } else {
            None
        }
    }

    pub fn zone(&self, phase: Phase) -> Option<Zone> {
        match phase {
            Phase::Down => Some(self.down),
            Phase::Up => Some(self.up),
            Phase::Idle => None,
        }
    }

    /// Width of the dead band between the two zones (degrees)
    pub fn dead_band(&self) -> f32 {
        (self.up.cutoff() - self.down.cutoff()).abs()
    }

    /// Zones must point in opposite directions and leave a gap between them
    pub fn validate(&self) -> Result<()> {
        let separated = match (self.down, self.up) {
            (Zone::Below(d), Zone::Above(u)) => d < u,
            (Zone::Above(d), Zone::Below(u)) => u < d,
            _ => {
                return Err(EngineError::invalid_config(
                    "up and down zones must point in opposite directions",
                ))
            }
        };
        if !separated {
            return Err(EngineError::invalid_config(
                "up and down zones overlap; no hysteresis dead band",
            ));
        }
        if self.count_on == Phase::Idle {
            return Err(EngineError::invalid_config("count_on must be up or down"));
        }
        Ok(())
    }
}
