//! Skeleton module - COCO keypoint frames from the pose estimator
//!
//! Re-exports only. All logic in submodules.

mod landmarks;

pub use landmarks::{
    Landmark, Side, Skeleton,
    // Constants
    LANDMARK_COUNT, FLAT_XY_LEN, FLAT_XYC_LEN,
    NOSE, LEFT_EYE, RIGHT_EYE, LEFT_EAR, RIGHT_EAR,
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST,
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
    LEFT_ANKLE, RIGHT_ANKLE,
};
