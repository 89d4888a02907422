//! Geometric form checks run once per completed rep
//!
//! Each check looks at the skeleton captured at the deepest point of the rep
//! (plus the rep's angle extremes) and either passes or yields a finding with
//! a score deduction. A check whose landmarks are not visible is skipped.

use serde::{Deserialize, Serialize};

use super::report::PERFECT_SCORE;
use crate::error::{EngineError, Result};
use crate::kinematics::skeleton_angle;
use crate::profile::ExerciseProfile;
use crate::skeleton::*;

/// One configurable form rule
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum FormCheck {
    /// Knee drifting sideways off the ankle, as a fraction of shin length
    KneeTracking { max_ratio: f32, deduction: u32 },
    /// Lowest angle of the rep must reach `max_angle`
    Depth { max_angle: f32, deduction: u32 },
    /// Shoulder-hip-ankle line may bend at most `max_deviation` degrees
    BodyLine { max_deviation: f32, deduction: u32 },
    /// Elbow drifting off the shoulder, as a fraction of torso length
    ElbowDrift { max_ratio: f32, deduction: u32 },
    /// Left and right joint angles may differ at most `max_difference` degrees
    Symmetry { max_difference: f32, deduction: u32 },
}

/// Failed check
#[derive(Clone, Debug, PartialEq)]
pub struct Finding {
    pub message: String,
    pub deduction: u32,
}

/// Everything a check may look at for one rep
pub struct RepContext<'a> {
    pub profile: &'a ExerciseProfile,
    /// Skeleton at the deepest point of the rep
    pub skeleton: &'a Skeleton,
    pub min_confidence: f32,
    pub min_angle: f32,
    pub max_angle: f32,
}

impl RepContext<'_> {
    fn point(&self, index: usize) -> Option<(f32, f32)> {
        self.skeleton.point(index, self.min_confidence)
    }
}

impl FormCheck {
    pub fn deduction(&self) -> u32 {
        match *self {
            FormCheck::KneeTracking { deduction, .. }
            | FormCheck::Depth { deduction, .. }
            | FormCheck::BodyLine { deduction, .. }
            | FormCheck::ElbowDrift { deduction, .. }
            | FormCheck::Symmetry { deduction, .. } => deduction,
        }
    }

    /// Limit the check compares against
    fn limit(&self) -> (&'static str, f32) {
        match *self {
            FormCheck::KneeTracking { max_ratio, .. } => ("max_ratio", max_ratio),
            FormCheck::Depth { max_angle, .. } => ("max_angle", max_angle),
            FormCheck::BodyLine { max_deviation, .. } => ("max_deviation", max_deviation),
            FormCheck::ElbowDrift { max_ratio, .. } => ("max_ratio", max_ratio),
            FormCheck::Symmetry { max_difference, .. } => ("max_difference", max_difference),
        }
    }

    /// Reject limits that are not finite and non-negative, and deductions above a full score
    pub fn validate(&self) -> Result<()> {
        let (name, limit) = self.limit();
        if !limit.is_finite() || limit < 0.0 {
            return Err(EngineError::invalid_config(format!(
                "{name} must be finite and not negative, got {limit}"
            )));
        }
        if self.deduction() > PERFECT_SCORE {
            return Err(EngineError::invalid_config(format!(
                "deduction must be at most {PERFECT_SCORE}, got {}",
                self.deduction()
            )));
        }
        Ok(())
    }

    /// Run the check; None when it passed or could not be evaluated
    pub fn evaluate(&self, ctx: &RepContext<'_>) -> Option<Finding> {
        let message = match *self {
            FormCheck::KneeTracking { max_ratio, .. } => {
                let worst = worst_drift(ctx, [(LEFT_KNEE, LEFT_ANKLE), (RIGHT_KNEE, RIGHT_ANKLE)])?;
                (worst > max_ratio).then(|| "Keep your knees over your ankles".to_string())
            }
            FormCheck::Depth { max_angle, .. } => (ctx.min_angle > max_angle).then(|| {
                format!("Go deeper: lowest angle {:.0}°, aim for {max_angle:.0}°", ctx.min_angle)
            }),
            FormCheck::BodyLine { max_deviation, .. } => {
                let worst = [
                    [LEFT_SHOULDER, LEFT_HIP, LEFT_ANKLE],
                    [RIGHT_SHOULDER, RIGHT_HIP, RIGHT_ANKLE],
                ]
                .iter()
                .filter_map(|&joints| skeleton_angle(ctx.skeleton, joints, ctx.min_confidence))
                .map(|angle| 180.0 - angle)
                .reduce(f32::max)?;
                (worst > max_deviation)
                    .then(|| "Keep your body in a straight line".to_string())
            }
            FormCheck::ElbowDrift { max_ratio, .. } => {
                let worst = [
                    (LEFT_SHOULDER, LEFT_ELBOW, LEFT_HIP),
                    (RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_HIP),
                ]
                .iter()
                .filter_map(|&(shoulder, elbow, hip)| {
                    let s = ctx.point(shoulder)?;
                    let e = ctx.point(elbow)?;
                    let h = ctx.point(hip)?;
                    let torso = distance(s, h);
                    (torso > f32::EPSILON).then(|| (e.0 - s.0).abs() / torso)
                })
                .reduce(f32::max)?;
                (worst > max_ratio)
                    .then(|| "Keep your elbows close to your body".to_string())
            }
            FormCheck::Symmetry { max_difference, .. } => {
                let side_angle = |joints: Option<[usize; 3]>| {
                    joints.and_then(|j| skeleton_angle(ctx.skeleton, j, ctx.min_confidence))
                };
                let left = side_angle(ctx.profile.left)?;
                let right = side_angle(ctx.profile.right)?;
                let difference = (left - right).abs();
                (difference > max_difference)
                    .then(|| format!("Move both sides evenly ({difference:.0}° apart)"))
            }
        }?;
        Some(Finding {
            message,
            deduction: self.deduction(),
        })
    }
}

/// Run every check of the profile in order
pub fn run_checks(ctx: &RepContext<'_>) -> Vec<Finding> {
    ctx.profile
        .checks
        .iter()
        .filter_map(|check| check.evaluate(ctx))
        .collect()
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Largest sideways offset of `upper` over `lower`, relative to their distance
fn worst_drift(ctx: &RepContext<'_>, pairs: [(usize, usize); 2]) -> Option<f32> {
    pairs
        .iter()
        .filter_map(|&(upper, lower)| {
            let u = ctx.point(upper)?;
            let l = ctx.point(lower)?;
            let length = distance(u, l);
            (length > f32::EPSILON).then(|| (u.0 - l.0).abs() / length)
        })
        .reduce(f32::max)
}
