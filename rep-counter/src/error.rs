//! Error types for the rep counting engine.

use thiserror::Error;

/// Errors raised by the engine, its registry and its configuration.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Exercise identifier absent from the profile registry.
    #[error("unknown exercise: {0}")]
    UnknownExercise(String),

    /// Missing, low-confidence or degenerate landmark geometry.
    ///
    /// Recovered inside the engine; a frame that hits it simply produces
    /// no update.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),

    /// Profile or engine configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Flat landmark array with an unsupported length.
    #[error("invalid frame: expected {expected} values, got {actual}")]
    InvalidFrame {
        /// Accepted length(s), as text.
        expected: &'static str,
        /// Length received.
        actual: usize,
    },

    /// JSON decoding of a config or registry failed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Creates an unknown exercise error.
    #[must_use]
    pub fn unknown_exercise(id: impl Into<String>) -> Self {
        Self::UnknownExercise(id.into())
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates an invalid frame error.
    #[must_use]
    pub const fn invalid_frame(expected: &'static str, actual: usize) -> Self {
        Self::InvalidFrame { expected, actual }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_exercise_names_the_id() {
        let err = EngineError::unknown_exercise("burpee");
        assert!(err.to_string().contains("unknown exercise"));
        assert!(err.to_string().contains("burpee"));
    }

    #[test]
    fn invalid_frame_reports_lengths() {
        let err = EngineError::invalid_frame("34 or 51", 99);
        let msg = err.to_string();
        assert!(msg.contains("34 or 51"));
        assert!(msg.contains("99"));
    }

    #[test]
    fn json_errors_convert() {
        let parse = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: EngineError = parse.into();
        assert!(matches!(err, EngineError::Json(_)));
    }
}
