//! Rep debounce - minimum interval between counted reps
//!
//! Only the counter increment is gated. The phase transition that would have
//! counted still happens, so the displayed phase stays truthful.

/// Default minimum seconds between two counted reps
pub const DEFAULT_MIN_INTERVAL: f64 = 0.5;

/// Wall-clock gate on rep increments
#[derive(Clone, Debug)]
pub struct RepDebounce {
    /// Minimum seconds between accepted reps
    min_interval: f64,
    /// Timestamp (seconds) of the last accepted rep
    last_rep: Option<f64>,
}

impl RepDebounce {
    pub fn new(min_interval: f64) -> Self {
        Self {
            min_interval: min_interval.max(0.0),
            last_rep: None,
        }
    }

    /// Ask to count a rep at time `t` (seconds)
    ///
    /// Returns true and records `t` when enough time has passed since the
    /// last accepted rep; returns false otherwise and changes nothing.
    pub fn try_accept(&mut self, t: f64) -> bool {
        if let Some(last) = self.last_rep {
            if t - last < self.min_interval {
                return false;
            }
        }
        self.last_rep = Some(t);
        true
    }

    /// Would a rep at `t` be accepted?
    pub fn is_open(&self, t: f64) -> bool {
        self.last_rep.map_or(true, |last| t - last >= self.min_interval)
    }

    pub fn last_rep(&self) -> Option<f64> {
        self.last_rep
    }

    pub fn min_interval(&self) -> f64 {
        self.min_interval
    }

    pub fn reset(&mut self) {
        self.last_rep = None;
    }
}

impl Default for RepDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
