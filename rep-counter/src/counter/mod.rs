//! Counter module - phase machine, session state and the counting facade
//!
//! Re-exports only. All logic in submodules.

mod phase;
mod state;
mod routine;
mod engine;

pub use phase::{Phase, PhaseMachine, Transition};
pub use state::{CounterSnapshot, CounterState};
pub use engine::ExerciseCounter;
