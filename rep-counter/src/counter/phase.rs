//! Up/down phase machine with hysteresis
//!
//! IDLE → UP → DOWN → UP → … with no terminal state. The machine only moves
//! when an observation lands inside a zone; dead-band observations hold the
//! current phase. Entering the profile's `count_on` phase from the opposite
//! phase completes a rep. Whether that rep is counted (debounce, alternation)
//! is up to the caller.

use serde::{Deserialize, Serialize};

use crate::profile::Thresholds;

/// Coarse position of the tracked angle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No zone entered yet this session
    #[default]
    Idle,
    Up,
    Down,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Up => "up",
            Phase::Down => "down",
        }
    }

    /// Up ↔ Down; Idle has no opposite
    pub fn opposite(self) -> Option<Self> {
        match self {
            Phase::Up => Some(Phase::Down),
            Phase::Down => Some(Phase::Up),
            Phase::Idle => None,
        }
    }
}

/// Result of feeding one observation to the machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Phase unchanged (same zone or dead band)
    Hold,
    /// Phase changed without completing a rep
    Entered(Phase),
    /// Phase changed into `count_on` from the opposite phase
    Completed(Phase),
}

impl Transition {
    pub fn is_completed(self) -> bool {
        matches!(self, Transition::Completed(_))
    }
}

/// Hysteresis state machine for one angle stream (or one joint pair)
#[derive(Clone, Debug)]
pub struct PhaseMachine {
    thresholds: Thresholds,
    phase: Phase,
}

impl PhaseMachine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Feed a smoothed angle
    pub fn observe(&mut self, angle: f32) -> Transition {
        let zone = self.thresholds.classify(angle);
        self.observe_phase(zone)
    }

    /// Feed an already classified observation (None = dead band)
    pub fn observe_phase(&mut self, observed: Option<Phase>) -> Transition {
        let next = match observed {
            Some(next) if next != Phase::Idle && next != self.phase => next,
            _ => return Transition::Hold,
        };

        let previous = self.phase;
        self.phase = next;

        let count_on = self.thresholds.count_on;
        if next == count_on && count_on.opposite() == Some(previous) {
            Transition::Completed(next)
        } else {
            Transition::Entered(next)
        }
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Zone;

    fn squat_machine() -> PhaseMachine {
        PhaseMachine::new(Thresholds::new(Zone::Below(110.0), Zone::Above(160.0), Phase::Down))
    }

    #[test]
    fn starts_idle() {
        assert_eq!(squat_machine().phase(), Phase::Idle);
    }

    #[test]
    fn squat_sequence_completes_once() {
        let mut machine = squat_machine();
        let angles = [170.0, 165.0, 150.0, 120.0, 100.0, 105.0, 150.0, 165.0, 170.0];
        let completed = angles
            .iter()
            .filter(|&&a| machine.observe(a).is_completed())
            .count();
        assert_eq!(completed, 1);
        assert_eq!(machine.phase(), Phase::Up);
    }

    #[test]
    fn entry_from_idle_never_completes() {
        let mut machine = squat_machine();
        assert_eq!(machine.observe(90.0), Transition::Entered(Phase::Down));
        assert_eq!(machine.observe(170.0), Transition::Entered(Phase::Up));
        assert_eq!(machine.observe(90.0), Transition::Completed(Phase::Down));
    }

    #[test]
    fn dead_band_flapping_holds() {
        let mut machine = squat_machine();
        machine.observe(170.0);
        for angle in [158.0, 162.0, 157.0, 161.0, 112.0, 108.0, 113.0] {
            machine.observe(angle);
        }
        // Only the 108° sample entered a zone; one completion at most
        assert_eq!(machine.phase(), Phase::Down);
        let mut again = squat_machine();
        again.observe(170.0);
        let flaps = [161.0, 159.0, 161.0, 159.0, 161.0]
            .iter()
            .filter(|&&a| again.observe(a) != Transition::Hold)
            .count();
        assert_eq!(flaps, 0);
    }

    #[test]
    fn count_on_up() {
        let mut machine =
            PhaseMachine::new(Thresholds::new(Zone::Above(160.0), Zone::Below(60.0), Phase::Up));
        assert_eq!(machine.observe(170.0), Transition::Entered(Phase::Down));
        assert_eq!(machine.observe(50.0), Transition::Completed(Phase::Up));
        assert_eq!(machine.observe(45.0), Transition::Hold);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut machine = squat_machine();
        machine.observe(170.0);
        machine.reset();
        assert_eq!(machine.phase(), Phase::Idle);
        assert_eq!(machine.observe(90.0), Transition::Entered(Phase::Down));
    }
}
