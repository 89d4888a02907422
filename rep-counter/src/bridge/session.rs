//! Counter session and JS entry points
//!
//! Holds one FormQualityAnalyzer for the page. JavaScript selects an
//! exercise, then pushes one flat keypoint array per inference frame.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use super::clock::PerformanceClock;
use crate::counter::ExerciseCounter;
use crate::error::EngineError;
use crate::quality::FormQualityAnalyzer;
use crate::skeleton::Skeleton;

impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static SESSION: RefCell<Option<FormQualityAnalyzer>> = const { RefCell::new(None) };
}

/// Run `f` on the page's analyzer, creating it on first use
fn with_session<R>(f: impl FnOnce(&mut FormQualityAnalyzer) -> R) -> R {
    SESSION.with(|cell| {
        let mut slot = cell.borrow_mut();
        // `Instant` panics on wasm32; the clock must be set at construction
        let analyzer = slot.get_or_insert_with(|| {
            FormQualityAnalyzer::new(ExerciseCounter::from_clock(PerformanceClock::new()))
        });
        f(analyzer)
    })
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Start counting `exercise_id` from zero
#[wasm_bindgen]
pub fn select_exercise(exercise_id: &str) -> Result<(), JsValue> {
    with_session(|session| {
        session.inner_mut().select(exercise_id)?;
        session.reset();
        Ok::<_, EngineError>(())
    })?;
    web_sys::console::log_1(&format!("exercise selected: {exercise_id}").into());
    Ok(())
}

/// Called from JavaScript with a flat Float32Array of 34 values
/// (17 keypoints × x, y) or 51 values (17 keypoints × x, y, score)
///
/// Returns the display angle, or undefined when the frame was unusable.
#[wasm_bindgen]
pub fn process_frame(exercise_id: &str, data: &[f32]) -> Result<Option<f32>, JsValue> {
    let skeleton = match Skeleton::from_flat(data) {
        Ok(skeleton) => skeleton,
        Err(err) => {
            web_sys::console::warn_1(&err.to_string().into());
            return Err(err.into());
        }
    };
    Ok(with_session(|session| session.process(exercise_id, &skeleton))?)
}

#[wasm_bindgen]
pub fn reset_counter() {
    with_session(FormQualityAnalyzer::reset);
}

#[wasm_bindgen]
pub fn get_counter() -> u32 {
    with_session(|session| session.counter())
}

/// "idle", "up" or "down"
#[wasm_bindgen]
pub fn get_phase() -> String {
    with_session(|session| session.phase().as_str().to_string())
}

/// Manual correction; returns the new count
#[wasm_bindgen]
pub fn adjust_counter(delta: i32) -> u32 {
    with_session(|session| session.inner_mut().adjust(delta))
}

#[wasm_bindgen]
pub fn get_quality_score() -> f32 {
    with_session(|session| session.quality_score())
}

/// Reasons from the last rated rep
#[wasm_bindgen]
pub fn get_feedback() -> Vec<String> {
    with_session(|session| session.feedback().to_vec())
}

/// Full quality report as JSON
#[wasm_bindgen]
pub fn get_report() -> Result<String, JsValue> {
    let report = with_session(|session| session.report());
    serde_json::to_string(&report).map_err(|e| EngineError::from(e).into())
}

/// Counter snapshot as JSON
#[wasm_bindgen]
pub fn get_snapshot() -> Result<String, JsValue> {
    let snapshot = with_session(|session| session.inner().snapshot());
    serde_json::to_string(&snapshot).map_err(|e| EngineError::from(e).into())
}

/// Landmark indices the display angle is measured at (first, vertex, last)
#[wasm_bindgen]
pub fn get_display_joints() -> Option<Vec<u32>> {
    with_session(|session| {
        session
            .inner()
            .display_joints()
            .map(|joints| joints.iter().map(|&i| i as u32).collect())
    })
}

#[wasm_bindgen]
pub fn list_exercises() -> Vec<String> {
    with_session(|session| session.inner().registry().ids().map(str::to_string).collect())
}

/// Add or retune exercise profiles from a JSON array
#[wasm_bindgen]
pub fn load_profiles(json: &str) -> Result<(), JsValue> {
    with_session(|session| session.inner_mut().registry_mut().extend_from_json(json))?;
    web_sys::console::log_1(&"exercise profiles loaded".into());
    Ok(())
}
