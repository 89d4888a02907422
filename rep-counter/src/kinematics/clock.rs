//! Time source for debounce
//!
//! The engine only needs monotonically increasing seconds. Native callers get
//! `Instant`; the browser bridge supplies `performance.now()`; tests use
//! `ManualClock`.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Seconds since an arbitrary fixed origin
pub trait Clock {
    fn now(&self) -> f64;
}

/// `std::time::Instant` based clock
///
/// Not usable on `wasm32-unknown-unknown`, where `Instant::now` panics.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock advanced by hand; clones share the same time
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    seconds: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, seconds: f64) {
        self.seconds.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.seconds.set(self.seconds.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.seconds.get()
    }
}
