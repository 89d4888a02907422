//! Exercise identifier → profile lookup
//!
//! The built-in catalogue holds calibration defaults. They are meant to be
//! retuned against recorded sessions, either by loading a JSON registry or by
//! overriding single entries.

use std::collections::BTreeMap;

use tracing::warn;

use super::exercise::{CountingMode, ExerciseProfile};
use super::zones::{Thresholds, Zone};
use crate::counter::Phase;
use crate::error::{EngineError, Result};
use crate::quality::FormCheck;
use crate::skeleton::*;

// ============================================================================
// JOINT TRIPLETS (first, vertex, last)
// ============================================================================

const LEFT_KNEE_JOINT: [usize; 3] = [LEFT_HIP, LEFT_KNEE, LEFT_ANKLE];
const RIGHT_KNEE_JOINT: [usize; 3] = [RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE];
const LEFT_ELBOW_JOINT: [usize; 3] = [LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST];
const RIGHT_ELBOW_JOINT: [usize; 3] = [RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST];
const LEFT_HIP_JOINT: [usize; 3] = [LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE];
const RIGHT_HIP_JOINT: [usize; 3] = [RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE];
const LEFT_SHOULDER_JOINT: [usize; 3] = [LEFT_HIP, LEFT_SHOULDER, LEFT_ELBOW];
const RIGHT_SHOULDER_JOINT: [usize; 3] = [RIGHT_HIP, RIGHT_SHOULDER, RIGHT_ELBOW];

/// Validated set of exercise profiles
#[derive(Clone, Debug, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, ExerciseProfile>,
}

impl ProfileRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The default exercise catalogue
    pub fn builtin() -> Self {
        let profiles = builtin_profiles()
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();
        Self { profiles }
    }

    /// Registry from a JSON array of profiles
    pub fn from_json(json: &str) -> Result<Self> {
        let mut registry = Self::new();
        registry.extend_from_json(json)?;
        Ok(registry)
    }

    /// Add or override profiles from a JSON array
    ///
    /// All profiles are validated before any is inserted.
    pub fn extend_from_json(&mut self, json: &str) -> Result<()> {
        let profiles: Vec<ExerciseProfile> = serde_json::from_str(json)?;
        for profile in &profiles {
            if let Err(e) = profile.validate() {
                warn!(exercise = %profile.id, error = %e, "rejected exercise profile");
                return Err(e);
            }
        }
        for profile in profiles {
            self.profiles.insert(profile.id.clone(), profile);
        }
        Ok(())
    }

    /// Add or override a single profile
    pub fn insert(&mut self, profile: ExerciseProfile) -> Result<()> {
        profile.validate()?;
        self.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&ExerciseProfile> {
        self.profiles
            .get(id)
            .ok_or_else(|| EngineError::unknown_exercise(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.profiles.contains_key(id)
    }

    /// Exercise identifiers in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

// ============================================================================
// BUILT-IN CATALOGUE
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn profile(
    id: &str,
    left: Option<[usize; 3]>,
    right: Option<[usize; 3]>,
    down: Zone,
    up: Zone,
    count_on: Phase,
    mode: CountingMode,
    kcal_per_rep: f32,
    checks: Vec<FormCheck>,
) -> ExerciseProfile {
    ExerciseProfile {
        id: id.to_string(),
        left,
        right,
        thresholds: Thresholds::new(down, up, count_on),
        mode,
        kcal_per_rep,
        checks,
    }
}

fn builtin_profiles() -> Vec<ExerciseProfile> {
    use CountingMode::{Alternating, Bilateral, SingleSide};
    use Phase::{Down, Up};
    use Zone::{Above, Below};

    let arm_symmetry = FormCheck::Symmetry { max_difference: 20.0, deduction: 10 };

    vec![
        profile(
            "squat",
            Some(LEFT_KNEE_JOINT), Some(RIGHT_KNEE_JOINT),
            Below(110.0), Above(160.0), Down, Bilateral, 0.32,
            vec![
                FormCheck::KneeTracking { max_ratio: 0.35, deduction: 15 },
                FormCheck::Depth { max_angle: 100.0, deduction: 10 },
            ],
        ),
        profile(
            "pushup",
            Some(LEFT_ELBOW_JOINT), Some(RIGHT_ELBOW_JOINT),
            Below(100.0), Above(160.0), Down, Bilateral, 0.36,
            vec![FormCheck::BodyLine { max_deviation: 20.0, deduction: 20 }],
        ),
        profile(
            "situp",
            Some(LEFT_HIP_JOINT), Some(RIGHT_HIP_JOINT),
            Above(80.0), Below(45.0), Down, Bilateral, 0.25,
            Vec::new(),
        ),
        profile(
            "bicep_curl",
            Some(LEFT_ELBOW_JOINT), Some(RIGHT_ELBOW_JOINT),
            Above(160.0), Below(60.0), Up, Bilateral, 0.15,
            vec![FormCheck::ElbowDrift { max_ratio: 0.3, deduction: 15 }],
        ),
        profile(
            "lateral_raise",
            Some(LEFT_SHOULDER_JOINT), Some(RIGHT_SHOULDER_JOINT),
            Below(30.0), Above(80.0), Up, Bilateral, 0.12,
            vec![arm_symmetry.clone()],
        ),
        profile(
            "overhead_press",
            Some(LEFT_SHOULDER_JOINT), Some(RIGHT_SHOULDER_JOINT),
            Below(30.0), Above(150.0), Up, Bilateral, 0.2,
            vec![arm_symmetry],
        ),
        profile(
            "leg_raise",
            Some(LEFT_HIP_JOINT), Some(RIGHT_HIP_JOINT),
            Above(160.0), Below(130.0), Up, Alternating, 0.18,
            Vec::new(),
        ),
        profile(
            "knee_raise",
            None, Some(RIGHT_KNEE_JOINT),
            Above(160.0), Below(110.0), Up, SingleSide { side: Side::Right }, 0.1,
            Vec::new(),
        ),
        profile(
            "left_knee_press",
            Some(LEFT_HIP_JOINT), None,
            Above(150.0), Below(110.0), Down, SingleSide { side: Side::Left }, 0.1,
            Vec::new(),
        ),
        profile(
            "right_knee_press",
            None, Some(RIGHT_HIP_JOINT),
            Above(150.0), Below(110.0), Down, SingleSide { side: Side::Right }, 0.1,
            Vec::new(),
        ),
    ]
}
