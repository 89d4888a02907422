//! Landmark storage for one detected person
//!
//! The upstream pose estimator hands over 17 (x, y) keypoints in COCO order,
//! optionally with a parallel confidence array. A keypoint at exactly (0, 0)
//! means "not detected".

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

// ============================================================================
// LANDMARK INDICES (COCO keypoints - 17 total)
// ============================================================================

pub const LANDMARK_COUNT: usize = 17;

pub const NOSE: usize = 0;
pub const LEFT_EYE: usize = 1;
pub const RIGHT_EYE: usize = 2;
pub const LEFT_EAR: usize = 3;
pub const RIGHT_EAR: usize = 4;
pub const LEFT_SHOULDER: usize = 5;
pub const RIGHT_SHOULDER: usize = 6;
pub const LEFT_ELBOW: usize = 7;
pub const RIGHT_ELBOW: usize = 8;
pub const LEFT_WRIST: usize = 9;
pub const RIGHT_WRIST: usize = 10;
pub const LEFT_HIP: usize = 11;
pub const RIGHT_HIP: usize = 12;
pub const LEFT_KNEE: usize = 13;
pub const RIGHT_KNEE: usize = 14;
pub const LEFT_ANKLE: usize = 15;
pub const RIGHT_ANKLE: usize = 16;

/// Flat frame length without confidence (x, y per landmark)
pub const FLAT_XY_LEN: usize = LANDMARK_COUNT * 2;

/// Flat frame length with confidence (x, y, score per landmark)
pub const FLAT_XYC_LEN: usize = LANDMARK_COUNT * 3;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Body side a limb belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Slot in per-side arrays
    pub(crate) fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// A single 2D keypoint
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Detection score in [0, 1], when the estimator provides one
    pub confidence: Option<f32>,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, confidence: None }
    }

    pub const fn with_confidence(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence: Some(confidence) }
    }

    /// Exact (0, 0) is how the estimator reports a missing point
    pub fn is_sentinel(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Usable for geometry: detected, finite and confident enough
    pub fn is_valid(&self, min_confidence: f32) -> bool {
        if self.is_sentinel() || !self.x.is_finite() || !self.y.is_finite() {
            return false;
        }
        match self.confidence {
            Some(score) => score >= min_confidence,
            None => true,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// One frame of keypoints in fixed COCO topology
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl Default for Skeleton {
    fn default() -> Self {
        Self {
            landmarks: [Landmark::default(); LANDMARK_COUNT],
        }
    }
}

impl Skeleton {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Build from positions only (no confidence scores)
    pub fn from_points(points: [(f32, f32); LANDMARK_COUNT]) -> Self {
        let mut skeleton = Self::default();
        for (slot, (x, y)) in skeleton.landmarks.iter_mut().zip(points) {
            *slot = Landmark::new(x, y);
        }
        skeleton
    }

    /// Build from positions plus the parallel confidence array
    pub fn with_confidence(
        points: [(f32, f32); LANDMARK_COUNT],
        scores: [f32; LANDMARK_COUNT],
    ) -> Self {
        let mut skeleton = Self::default();
        for (i, slot) in skeleton.landmarks.iter_mut().enumerate() {
            *slot = Landmark::with_confidence(points[i].0, points[i].1, scores[i]);
        }
        skeleton
    }

    /// Decode a flat array: 34 values (x, y) or 51 values (x, y, score)
    pub fn from_flat(data: &[f32]) -> Result<Self> {
        let stride = match data.len() {
            FLAT_XY_LEN => 2,
            FLAT_XYC_LEN => 3,
            other => return Err(EngineError::invalid_frame("34 or 51", other)),
        };

        let mut skeleton = Self::default();
        for (slot, chunk) in skeleton.landmarks.iter_mut().zip(data.chunks_exact(stride)) {
            *slot = Landmark {
                x: chunk[0],
                y: chunk[1],
                confidence: chunk.get(2).copied(),
            };
        }
        Ok(skeleton)
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    pub fn set(&mut self, index: usize, landmark: Landmark) {
        if let Some(slot) = self.landmarks.get_mut(index) {
            *slot = landmark;
        }
    }

    /// Position of a landmark, or None when it must not feed geometry
    pub fn point(&self, index: usize, min_confidence: f32) -> Option<(f32, f32)> {
        self.landmarks
            .get(index)
            .filter(|lm| lm.is_valid(min_confidence))
            .map(Landmark::position)
    }

    /// Number of landmarks usable at the given confidence
    pub fn valid_count(&self, min_confidence: f32) -> usize {
        self.landmarks
            .iter()
            .filter(|lm| lm.is_valid(min_confidence))
            .count()
    }
}
