//! Kinematics module - joint angles, smoothing and rep timing
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod smoother;
mod debounce;
mod clock;

pub use angles::{joint_angle, skeleton_angle};
pub use smoother::{AngleSmoother, DEFAULT_WINDOW, DEFAULT_MIN_SAMPLES, DEFAULT_SIGMA};
pub use debounce::{RepDebounce, DEFAULT_MIN_INTERVAL};
pub use clock::{Clock, ManualClock, MonotonicClock};
