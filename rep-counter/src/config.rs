//! Engine tuning knobs
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a usable config.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Tuning shared by every exercise in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Samples kept per angle stream for smoothing
    pub smoothing_window: usize,
    /// Below this many samples the raw angle passes through
    pub smoothing_min_samples: usize,
    /// Samples further than this many standard deviations from the median are dropped
    pub outlier_sigma: f32,
    /// Minimum seconds between two counted reps
    pub debounce_secs: f64,
    /// Landmarks scored below this are treated as missing
    pub min_confidence: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 5,
            smoothing_min_samples: 3,
            outlier_sigma: 2.0,
            debounce_secs: 0.5,
            min_confidence: 0.5,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the smoother and debounce cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.smoothing_window == 0 {
            return Err(EngineError::invalid_config("smoothing_window must be at least 1"));
        }
        if self.smoothing_min_samples == 0 {
            return Err(EngineError::invalid_config(
                "smoothing_min_samples must be at least 1",
            ));
        }
        if self.smoothing_min_samples > self.smoothing_window {
            return Err(EngineError::invalid_config(
                "smoothing_min_samples must not exceed smoothing_window",
            ));
        }
        if self.outlier_sigma.is_nan() || self.outlier_sigma <= 0.0 {
            return Err(EngineError::invalid_config("outlier_sigma must be positive"));
        }
        if self.debounce_secs.is_nan() || self.debounce_secs < 0.0 {
            return Err(EngineError::invalid_config("debounce_secs must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(EngineError::invalid_config("min_confidence must be within [0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.smoothing_window, 5);
        assert!((config.debounce_secs - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "debounce_secs": 0.8 }"#).unwrap();
        assert!((config.debounce_secs - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.smoothing_window, 5);
        assert!((config.min_confidence - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(EngineConfig::from_json(r#"{ "smoothing_window": 0 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "outlier_sigma": -1.0 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "debounce_secs": -0.1 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "min_confidence": 1.5 }"#).is_err());
    }

    #[test]
    fn min_samples_cannot_exceed_window() {
        let err = EngineConfig::from_json(r#"{ "smoothing_window": 3, "smoothing_min_samples": 4 }"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));

        let config = EngineConfig {
            smoothing_window: 1,
            smoothing_min_samples: 1,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = EngineConfig::from_json("{ smoothing_window: 5 ").unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }
}
