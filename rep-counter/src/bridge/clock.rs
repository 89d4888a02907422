//! Browser time source

use web_sys::Performance;

use crate::kinematics::Clock;

/// `performance.now()` in seconds
///
/// Without a window (e.g. inside a worker that lacks `performance`) the clock
/// stays at zero, which leaves debounce permanently closed after the first
/// rep. The bridge warns once when that happens.
pub struct PerformanceClock {
    performance: Option<Performance>,
}

impl PerformanceClock {
    pub fn new() -> Self {
        let performance = web_sys::window().and_then(|w| w.performance());
        if performance.is_none() {
            web_sys::console::warn_1(&"performance.now() unavailable; rep timing disabled".into());
        }
        Self { performance }
    }
}

impl Default for PerformanceClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        self.performance.as_ref().map_or(0.0, |p| p.now() / 1000.0)
    }
}
