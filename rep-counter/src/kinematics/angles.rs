//! Joint angle calculation using dot product
//!
//! Calculates the angle at a vertex joint from the vectors vertex→first
//! and vertex→last, e.g. knee→hip and knee→ankle for the knee angle.

use nalgebra::Vector2;

use crate::skeleton::Skeleton;

/// Vectors shorter than this are treated as zero-length
const MIN_SEGMENT: f32 = 1e-6;

/// Calculate the angle at `b` in degrees, within [0, 180]
///
/// Uses dot product formula: cos(θ) = (ba · bc) / (|ba| × |bc|)
///
/// Returns None when any point is the (0, 0) "not detected" sentinel or
/// when either segment has zero length.
pub fn joint_angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> Option<f32> {
    if [a, b, c].iter().any(|p| *p == (0.0, 0.0)) {
        return None;
    }

    let ba = Vector2::new(a.0 - b.0, a.1 - b.1);
    let bc = Vector2::new(c.0 - b.0, c.1 - b.1);

    let mag_ba = ba.norm();
    let mag_bc = bc.norm();
    if !(mag_ba > MIN_SEGMENT && mag_bc > MIN_SEGMENT) {
        return None;
    }

    let cos_angle = (ba.dot(&bc) / (mag_ba * mag_bc)).clamp(-1.0, 1.0);
    Some(cos_angle.acos().to_degrees())
}

/// Angle at the middle landmark of a (first, vertex, last) index triplet
///
/// Landmarks that are missing or scored below `min_confidence` yield None.
pub fn skeleton_angle(
    skeleton: &Skeleton,
    joints: [usize; 3],
    min_confidence: f32,
) -> Option<f32> {
    let a = skeleton.point(joints[0], min_confidence)?;
    let b = skeleton.point(joints[1], min_confidence)?;
    let c = skeleton.point(joints[2], min_confidence)?;
    joint_angle(a, b, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::{Landmark, LEFT_ANKLE, LEFT_HIP, LEFT_KNEE};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_straight_limb() {
        let angle = joint_angle((1.0, 1.0), (1.5, 1.0), (2.0, 1.0)).unwrap();
        assert_abs_diff_eq!(angle, 180.0, epsilon = 0.01);
    }

    #[test]
    fn test_right_angle() {
        let angle = joint_angle((1.0, 1.0), (1.5, 1.0), (1.5, 1.5)).unwrap();
        assert_abs_diff_eq!(angle, 90.0, epsilon = 0.01);
    }

    #[test]
    fn test_folded_limb() {
        let angle = joint_angle((2.0, 1.0), (1.0, 1.0), (2.0, 1.0)).unwrap();
        assert_abs_diff_eq!(angle, 0.0, epsilon = 0.05);
    }

    #[test]
    fn test_symmetric_in_end_points() {
        let triples = [
            ((10.0, 20.0), (30.0, 25.0), (15.0, 70.0)),
            ((0.3, 0.9), (0.4, 0.5), (0.8, 0.45)),
            ((-4.0, 2.0), (1.0, 1.0), (3.0, -7.5)),
        ];
        for (a, b, c) in triples {
            let forward = joint_angle(a, b, c).unwrap();
            let backward = joint_angle(c, b, a).unwrap();
            assert_abs_diff_eq!(forward, backward, epsilon = 1e-4);
            assert!((0.0..=180.0).contains(&forward));
        }
    }

    #[test]
    fn test_sentinel_yields_none() {
        let p = (3.0, 4.0);
        let q = (5.0, 9.0);
        assert!(joint_angle((0.0, 0.0), p, q).is_none());
        assert!(joint_angle(p, (0.0, 0.0), q).is_none());
        assert!(joint_angle(p, q, (0.0, 0.0)).is_none());
    }

    #[test]
    fn test_zero_length_segment_yields_none() {
        assert!(joint_angle((2.0, 2.0), (2.0, 2.0), (5.0, 1.0)).is_none());
        assert!(joint_angle((5.0, 1.0), (2.0, 2.0), (2.0, 2.0)).is_none());
    }

    #[test]
    fn test_skeleton_angle_respects_confidence() {
        let mut skeleton = Skeleton::default();
        skeleton.set(LEFT_HIP, Landmark::with_confidence(100.0, 100.0, 0.9));
        skeleton.set(LEFT_KNEE, Landmark::with_confidence(100.0, 200.0, 0.9));
        skeleton.set(LEFT_ANKLE, Landmark::with_confidence(100.0, 300.0, 0.3));

        let joints = [LEFT_HIP, LEFT_KNEE, LEFT_ANKLE];
        assert!(skeleton_angle(&skeleton, joints, 0.5).is_none());
        let angle = skeleton_angle(&skeleton, joints, 0.2).unwrap();
        assert_abs_diff_eq!(angle, 180.0, epsilon = 0.01);
    }
}
