//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod clock;
mod session;

pub use clock::PerformanceClock;
pub use session::{
    // WASM entry points
    select_exercise,
    process_frame,
    reset_counter,
    get_counter,
    get_phase,
    adjust_counter,
    get_quality_score,
    get_feedback,
    get_report,
    get_snapshot,
    get_display_joints,
    list_exercises,
    load_profiles,
};
