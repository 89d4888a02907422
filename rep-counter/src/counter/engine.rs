//! ExerciseCounter - the public counting facade
//!
//! Dispatches frames to the active exercise's profile, owns the session
//! state, and exposes count/phase accessors. Frames with unusable geometry
//! are dropped silently; unknown exercise identifiers are errors.

use tracing::{info, trace};

use super::phase::Phase;
use super::routine::{self, Frame};
use super::state::{CounterSnapshot, CounterState};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::kinematics::{Clock, MonotonicClock};
use crate::profile::{CountingMode, ExerciseProfile, ProfileRegistry};
use crate::skeleton::{Side, Skeleton};

/// Active exercise and its state
struct Session {
    profile: ExerciseProfile,
    state: CounterState,
}

/// Rep counter for one user session
pub struct ExerciseCounter {
    registry: ProfileRegistry,
    config: EngineConfig,
    clock: Box<dyn Clock>,
    session: Option<Session>,
}

impl ExerciseCounter {
    /// Built-in catalogue, default tuning, `Instant` clock
    ///
    /// Not for `wasm32-unknown-unknown`; use `from_clock` there.
    pub fn new() -> Self {
        Self::from_clock(MonotonicClock::new())
    }

    /// Built-in catalogue and default tuning with the given time source
    pub fn from_clock(clock: impl Clock + 'static) -> Self {
        Self {
            registry: ProfileRegistry::builtin(),
            config: EngineConfig::default(),
            clock: Box::new(clock),
            session: None,
        }
    }

    /// Custom registry and tuning, `Instant` clock
    pub fn with_registry(registry: ProfileRegistry, config: EngineConfig) -> Result<Self> {
        Self::with_clock_source(registry, config, MonotonicClock::new())
    }

    /// Custom registry, tuning and time source
    pub fn with_clock_source(
        registry: ProfileRegistry,
        config: EngineConfig,
        clock: impl Clock + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry,
            config,
            clock: Box::new(clock),
            session: None,
        })
    }

    /// Replace the time source used by `process`
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // ========================================================================
    // SESSION CONTROL
    // ========================================================================

    /// Start a fresh session for `exercise_id`
    pub fn select(&mut self, exercise_id: &str) -> Result<()> {
        let profile = self.registry.get(exercise_id)?.clone();
        let state = CounterState::new(&profile, &self.config);
        info!(exercise = exercise_id, "exercise selected");
        self.session = Some(Session { profile, state });
        Ok(())
    }

    /// Clear count, phase, smoothing history and latches
    ///
    /// Keeps the active exercise. Calling it twice equals calling it once.
    pub fn reset(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.state = CounterState::new(&session.profile, &self.config);
            info!(exercise = %session.profile.id, "counter reset");
        }
    }

    // ========================================================================
    // FRAME PROCESSING
    // ========================================================================

    /// Process one frame at the clock's current time
    ///
    /// Returns the display angle, or None when the frame could not be used.
    pub fn process(&mut self, exercise_id: &str, skeleton: &Skeleton) -> Result<Option<f32>> {
        let t = self.clock.now();
        self.process_at(exercise_id, skeleton, t)
    }

    /// Process one frame captured at `t` seconds
    pub fn process_at(
        &mut self,
        exercise_id: &str,
        skeleton: &Skeleton,
        t: f64,
    ) -> Result<Option<f32>> {
        if self.exercise() != Some(exercise_id) {
            self.select(exercise_id)?;
        }
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| EngineError::unknown_exercise(exercise_id))?;

        let frame = Frame {
            skeleton,
            min_confidence: self.config.min_confidence,
            t,
        };
        match routine::advance(&mut session.state, &session.profile, &frame) {
            Ok(angle) => {
                session.state.angle = Some(angle);
                Ok(Some(angle))
            }
            Err(EngineError::InvalidGeometry(reason)) => {
                trace!(exercise = exercise_id, reason, "frame skipped");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    // ========================================================================
    // MANUAL CORRECTION
    // ========================================================================

    /// Overwrite the count (phase and history untouched)
    pub fn set_counter(&mut self, count: u32) {
        if let Some(session) = self.session.as_mut() {
            let state = &mut session.state;
            state.manual_adjustments += i64::from(count) - i64::from(state.count);
            state.count = count;
        }
    }

    /// Add `delta` to the count, saturating at zero; returns the new count
    pub fn adjust(&mut self, delta: i32) -> u32 {
        let current = self.counter();
        let target = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta.unsigned_abs())
        };
        self.set_counter(target);
        self.counter()
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Reps counted so far (0 before any exercise is selected)
    pub fn counter(&self) -> u32 {
        self.state().map_or(0, CounterState::count)
    }

    pub fn phase(&self) -> Phase {
        self.state().map_or(Phase::Idle, CounterState::phase)
    }

    /// Display angle of the last successfully processed frame
    pub fn angle(&self) -> Option<f32> {
        self.state().and_then(CounterState::angle)
    }

    pub fn exercise(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.profile.id.as_str())
    }

    pub fn profile(&self) -> Option<&ExerciseProfile> {
        self.session.as_ref().map(|s| &s.profile)
    }

    pub fn state(&self) -> Option<&CounterState> {
        self.session.as_ref().map(|s| &s.state)
    }

    pub fn active_side(&self) -> Option<Side> {
        self.state().and_then(CounterState::active_side)
    }

    /// (left, right) reps for alternating and single-side exercises
    pub fn side_counts(&self) -> (u32, u32) {
        self.state().map_or((0, 0), |s| {
            (s.side_count(Side::Left), s.side_count(Side::Right))
        })
    }

    pub fn manual_adjustments(&self) -> i64 {
        self.state().map_or(0, CounterState::manual_adjustments)
    }

    /// Landmark triplet the display angle belongs to
    pub fn display_joints(&self) -> Option<[usize; 3]> {
        let session = self.session.as_ref()?;
        let profile = &session.profile;
        let side = match profile.mode {
            CountingMode::SingleSide { side } => side,
            CountingMode::Alternating => session.state.active_side.unwrap_or(Side::Right),
            CountingMode::Bilateral | CountingMode::BilateralAveraged { .. } => Side::Right,
        };
        profile.joints(side).or_else(|| profile.joints(side.opposite()))
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        let (left_count, right_count) = self.side_counts();
        CounterSnapshot {
            exercise: self.exercise().map(str::to_string),
            count: self.counter(),
            phase: self.phase(),
            angle: self.angle(),
            active_side: self.active_side(),
            left_count,
            right_count,
            manual_adjustments: self.manual_adjustments(),
        }
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Profile changes take effect at the next `select`
    pub fn registry_mut(&mut self) -> &mut ProfileRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current time of the session clock (seconds)
    pub fn now(&self) -> f64 {
        self.clock.now()
    }
}

impl Default for ExerciseCounter {
    fn default() -> Self {
        Self::new()
    }
}
