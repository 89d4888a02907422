//! Generic counting routine
//!
//! One function per counting mode, all parameterised by the profile's joint
//! triplets and thresholds. Returns the display angle, or `InvalidGeometry`
//! when the frame cannot move the state.

use tracing::{debug, trace};

use super::phase::{Phase, Transition};
use super::state::CounterState;
use crate::error::{EngineError, Result};
use crate::kinematics::skeleton_angle;
use crate::profile::{CountingMode, ExerciseProfile};
use crate::skeleton::{Side, Skeleton};

/// Inputs shared by every mode for one frame
pub(crate) struct Frame<'a> {
    pub skeleton: &'a Skeleton,
    pub min_confidence: f32,
    /// Seconds, from the session clock
    pub t: f64,
}

impl Frame<'_> {
    fn raw_angle(&self, profile: &ExerciseProfile, side: Side) -> Option<f32> {
        let joints = profile.joints(side)?;
        skeleton_angle(self.skeleton, joints, self.min_confidence)
    }
}

/// Advance `state` by one frame and return the display angle
pub(crate) fn advance(
    state: &mut CounterState,
    profile: &ExerciseProfile,
    frame: &Frame<'_>,
) -> Result<f32> {
    match profile.mode {
        CountingMode::Bilateral => bilateral(state, profile, frame, None),
        CountingMode::BilateralAveraged { tolerance } => {
            bilateral(state, profile, frame, Some(tolerance))
        }
        CountingMode::Alternating => alternating(state, profile, frame),
        CountingMode::SingleSide { side } => single_side(state, profile, frame, side),
    }
}

/// Increment the counter unless debounce suppresses it
fn count_rep(
    state: &mut CounterState,
    profile: &ExerciseProfile,
    side: Option<Side>,
    t: f64,
) -> bool {
    if !state.debounce.try_accept(t) {
        trace!(exercise = %profile.id, t, "rep suppressed by debounce");
        return false;
    }
    state.count += 1;
    if let Some(side) = side {
        state.side_counts[side.index()] += 1;
    }
    debug!(
        exercise = %profile.id,
        count = state.count,
        side = side.map(Side::as_str),
        "rep counted"
    );
    true
}

// ============================================================================
// BILATERAL
// ============================================================================

fn bilateral(
    state: &mut CounterState,
    profile: &ExerciseProfile,
    frame: &Frame<'_>,
    tolerance: Option<f32>,
) -> Result<f32> {
    // Both limbs must be visible; one limb alone could cheat the count
    let left = frame
        .raw_angle(profile, Side::Left)
        .ok_or(EngineError::InvalidGeometry("left limb not visible"))?;
    let right = frame
        .raw_angle(profile, Side::Right)
        .ok_or(EngineError::InvalidGeometry("right limb not visible"))?;

    let left = state.side_mut(Side::Left).smooth(left);
    let right = state.side_mut(Side::Right).smooth(right);
    let mean = (left + right) / 2.0;

    let thresholds = &profile.thresholds;
    let observed = match tolerance {
        None => match (thresholds.classify(left), thresholds.classify(right)) {
            (Some(a), Some(b)) if a == b => Some(a),
            _ => None,
        },
        Some(tolerance) => thresholds.classify(mean).filter(|&phase| {
            thresholds.zone(phase).map_or(false, |zone| {
                zone.contains_within(left, tolerance) && zone.contains_within(right, tolerance)
            })
        }),
    };

    let transition = state.machine.observe_phase(observed);
    state.phase = state.machine.phase();
    state.active_side = None;

    if transition.is_completed() {
        count_rep(state, profile, None, frame.t);
    }
    Ok(mean)
}

// ============================================================================
// ALTERNATING
// ============================================================================

fn alternating(
    state: &mut CounterState,
    profile: &ExerciseProfile,
    frame: &Frame<'_>,
) -> Result<f32> {
    let count_on = profile.thresholds.count_on;
    let mut angles: [Option<f32>; 2] = [None, None];

    for side in Side::BOTH {
        let Some(raw) = frame.raw_angle(profile, side) else {
            continue;
        };
        let track = state.side_mut(side);
        let smoothed = track.smooth(raw);
        let transition = track.machine.observe(smoothed);
        angles[side.index()] = Some(smoothed);

        match transition {
            Transition::Completed(_) => {
                state.active_side = Some(side);
                if state.last_rep_side == Some(side) {
                    trace!(exercise = %profile.id, side = side.as_str(), "same side twice in a row");
                } else if count_rep(state, profile, Some(side), frame.t) {
                    state.last_rep_side = Some(side);
                }
            }
            Transition::Entered(phase) if phase == count_on => {
                state.active_side = Some(side);
            }
            _ => {}
        }
    }

    // A side that has never been seen stays Idle and must not hold the phase
    let phases: Vec<Phase> = Side::BOTH
        .iter()
        .map(|&side| state.side(side).machine.phase())
        .filter(|&p| p != Phase::Idle)
        .collect();
    if phases.contains(&count_on) {
        state.phase = count_on;
    } else if let Some(rest) = count_on.opposite() {
        if !phases.is_empty() && phases.iter().all(|&p| p == rest) {
            state.phase = rest;
        }
    }

    state
        .active_side
        .and_then(|side| angles[side.index()])
        .or(angles[0])
        .or(angles[1])
        .ok_or(EngineError::InvalidGeometry("no limb visible"))
}

// ============================================================================
// SINGLE SIDE
// ============================================================================

fn single_side(
    state: &mut CounterState,
    profile: &ExerciseProfile,
    frame: &Frame<'_>,
    side: Side,
) -> Result<f32> {
    let raw = frame
        .raw_angle(profile, side)
        .ok_or(EngineError::InvalidGeometry("tracked limb not visible"))?;
    let smoothed = state.side_mut(side).smooth(raw);

    let transition = state.machine.observe(smoothed);
    state.phase = state.machine.phase();
    state.active_side = Some(side);

    if transition.is_completed() {
        count_rep(state, profile, Some(side), frame.t);
    }
    Ok(smoothed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::counter::Phase;
    use crate::profile::ProfileRegistry;
    use crate::skeleton::Landmark;

    /// Place `first` and `last` so the angle at `vertex` equals `degrees`
    fn bend(skeleton: &mut Skeleton, joints: [usize; 3], origin: (f32, f32), degrees: f32) {
        let rad = degrees.to_radians();
        skeleton.set(joints[1], Landmark::new(origin.0, origin.1));
        skeleton.set(joints[0], Landmark::new(origin.0, origin.1 - 100.0));
        skeleton.set(
            joints[2],
            Landmark::new(origin.0 + 100.0 * rad.sin(), origin.1 - 100.0 * rad.cos()),
        );
    }

    fn pose(profile: &ExerciseProfile, left: Option<f32>, right: Option<f32>) -> Skeleton {
        let mut skeleton = Skeleton::default();
        if let (Some(joints), Some(deg)) = (profile.left, left) {
            bend(&mut skeleton, joints, (200.0, 300.0), deg);
        }
        if let (Some(joints), Some(deg)) = (profile.right, right) {
            bend(&mut skeleton, joints, (600.0, 300.0), deg);
        }
        skeleton
    }

    fn run(profile: &ExerciseProfile, frames: &[(Option<f32>, Option<f32>)]) -> CounterState {
        // Raw angles straight into the machines
        let config = EngineConfig {
            smoothing_window: 1,
            smoothing_min_samples: 1,
            ..EngineConfig::default()
        };
        let mut state = CounterState::new(profile, &config);
        for (i, (left, right)) in frames.iter().enumerate() {
            let skeleton = pose(profile, *left, *right);
            let frame = Frame { skeleton: &skeleton, min_confidence: 0.5, t: i as f64 };
            let _ = advance(&mut state, profile, &frame);
        }
        state
    }

    #[test]
    fn bend_builds_requested_angle() {
        let registry = ProfileRegistry::builtin();
        let profile = registry.get("squat").unwrap();
        let skeleton = pose(profile, Some(95.0), Some(170.0));
        let left = skeleton_angle(&skeleton, profile.left.unwrap(), 0.5).unwrap();
        let right = skeleton_angle(&skeleton, profile.right.unwrap(), 0.5).unwrap();
        assert!((left - 95.0).abs() < 0.1);
        assert!((right - 170.0).abs() < 0.1);
    }

    #[test]
    fn bilateral_one_side_cannot_count() {
        let registry = ProfileRegistry::builtin();
        let squat = registry.get("squat").unwrap();
        let state = run(
            squat,
            &[
                (Some(170.0), Some(170.0)),
                (Some(90.0), Some(170.0)),
                (Some(170.0), Some(170.0)),
                (Some(90.0), Some(170.0)),
            ],
        );
        assert_eq!(state.count(), 0);
        assert_eq!(state.phase(), Phase::Up);
    }

    #[test]
    fn bilateral_both_sides_count() {
        let registry = ProfileRegistry::builtin();
        let squat = registry.get("squat").unwrap();
        let state = run(
            squat,
            &[(Some(170.0), Some(170.0)), (Some(90.0), Some(95.0)), (Some(170.0), Some(168.0))],
        );
        assert_eq!(state.count(), 1);
        assert_eq!(state.phase(), Phase::Up);
    }

    #[test]
    fn bilateral_missing_side_is_invalid_geometry() {
        let registry = ProfileRegistry::builtin();
        let squat = registry.get("squat").unwrap();
        let mut state = CounterState::new(squat, &EngineConfig::default());
        let skeleton = pose(squat, Some(170.0), None);
        let frame = Frame { skeleton: &skeleton, min_confidence: 0.5, t: 0.0 };
        let err = advance(&mut state, squat, &frame).unwrap_err();
        assert!(matches!(err, EngineError::InvalidGeometry(_)));
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn averaged_mode_accepts_uneven_sides() {
        let registry = ProfileRegistry::builtin();
        let mut squat = registry.get("squat").unwrap().clone();
        let frames = [(Some(170.0), Some(170.0)), (Some(100.0), Some(115.0)), (Some(170.0), Some(170.0))];

        // Strict: right side at 115° never enters the down zone
        assert_eq!(run(&squat, &frames).count(), 0);

        squat.mode = CountingMode::BilateralAveraged { tolerance: 10.0 };
        assert_eq!(run(&squat, &frames).count(), 1);

        // Too far outside the tolerance
        squat.mode = CountingMode::BilateralAveraged { tolerance: 2.0 };
        assert_eq!(run(&squat, &frames).count(), 0);
    }

    #[test]
    fn alternating_counts_each_side_once_per_turn() {
        let registry = ProfileRegistry::builtin();
        let leg_raise = registry.get("leg_raise").unwrap();
        let state = run(
            leg_raise,
            &[
                (Some(175.0), Some(175.0)),
                (Some(100.0), Some(175.0)), // left up: counts
                (Some(175.0), Some(175.0)),
                (Some(100.0), Some(175.0)), // left again: blocked
                (Some(175.0), Some(175.0)),
                (Some(175.0), Some(100.0)), // right: counts
                (Some(175.0), Some(175.0)),
                (Some(100.0), Some(175.0)), // left after right: counts
            ],
        );
        assert_eq!(state.count(), 3);
        assert_eq!(state.side_count(Side::Left), 2);
        assert_eq!(state.side_count(Side::Right), 1);
        assert_eq!(state.active_side(), Some(Side::Left));
        assert_eq!(state.phase(), Phase::Up);
    }

    #[test]
    fn alternating_tolerates_one_hidden_side() {
        let registry = ProfileRegistry::builtin();
        let leg_raise = registry.get("leg_raise").unwrap();
        let state = run(
            leg_raise,
            &[(Some(175.0), None), (Some(100.0), None), (Some(175.0), None)],
        );
        assert_eq!(state.count(), 1);
        assert_eq!(state.side_count(Side::Left), 1);
        // The hidden side never left Idle and must not pin the phase at Up
        assert_eq!(state.phase(), Phase::Down);
    }

    #[test]
    fn alternating_phase_follows_visible_side_between_reps() {
        let registry = ProfileRegistry::builtin();
        let leg_raise = registry.get("leg_raise").unwrap();
        let state = run(
            leg_raise,
            &[
                (None, Some(175.0)),
                (None, Some(100.0)),
                (None, Some(175.0)),
                (None, Some(100.0)),
            ],
        );
        // Second raise on the same side is blocked, but the phase still moves
        assert_eq!(state.count(), 1);
        assert_eq!(state.phase(), Phase::Up);

        let state = run(
            leg_raise,
            &[(None, Some(175.0)), (None, Some(100.0)), (None, Some(175.0))],
        );
        assert_eq!(state.phase(), Phase::Down);
    }

    #[test]
    fn single_side_ignores_other_limb() {
        let registry = ProfileRegistry::builtin();
        let press = registry.get("left_knee_press").unwrap();
        let mut profile = press.clone();
        // Give the right side joints so the pose helper moves it too
        profile.right = Some([6, 12, 14]);
        let state = run(
            &profile,
            &[
                (Some(170.0), Some(90.0)),
                (Some(100.0), Some(170.0)),
                (Some(170.0), Some(90.0)),
            ],
        );
        assert_eq!(state.count(), 1);
        assert_eq!(state.side_count(Side::Left), 1);
        assert_eq!(state.side_count(Side::Right), 0);
        assert_eq!(state.active_side(), Some(Side::Left));
        assert_eq!(state.phase(), Phase::Down);
    }
}
