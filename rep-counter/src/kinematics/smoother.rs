//! Angle smoothing with outlier rejection
//!
//! Keeps the last few valid samples of one angle stream. Once enough samples
//! exist, samples further than `sigma` standard deviations from the window
//! median are dropped and the rest are averaged. A one-frame spike is thrown
//! away instead of dragging the average the way a plain moving mean would.

use std::collections::VecDeque;

use crate::config::EngineConfig;

/// Samples kept by default
pub const DEFAULT_WINDOW: usize = 5;

/// Below this many samples the raw value passes through (no startup lag)
pub const DEFAULT_MIN_SAMPLES: usize = 3;

/// Outlier cutoff in standard deviations from the median
pub const DEFAULT_SIGMA: f32 = 2.0;

/// Median + trimmed-mean filter for one angle stream
#[derive(Clone, Debug)]
pub struct AngleSmoother {
    /// Ring buffer of recent valid samples
    history: VecDeque<f32>,
    window: usize,
    min_samples: usize,
    sigma: f32,
}

impl AngleSmoother {
    pub fn new(window: usize, min_samples: usize, sigma: f32) -> Self {
        let window = window.max(1);
        Self {
            history: VecDeque::with_capacity(window),
            window,
            min_samples: min_samples.max(1),
            sigma,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.smoothing_window,
            config.smoothing_min_samples,
            config.outlier_sigma,
        )
    }

    /// Add a sample and return the smoothed angle
    pub fn update(&mut self, angle: f32) -> f32 {
        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(angle);

        if self.history.len() < self.min_samples {
            return angle;
        }

        let samples: Vec<f32> = self.history.iter().copied().collect();
        let median = median(&samples);
        let n = samples.len() as f32;
        let mean = samples.iter().sum::<f32>() / n;
        let std_dev = (samples.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / n).sqrt();

        let cutoff = self.sigma * std_dev;
        let (sum, kept) = samples
            .iter()
            .filter(|s| (*s - median).abs() <= cutoff)
            .fold((0.0_f32, 0_usize), |(sum, kept), s| (sum + s, kept + 1));

        if kept == 0 {
            median
        } else {
            sum / kept as f32
        }
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Clear history (on reset or exercise switch)
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for AngleSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_MIN_SAMPLES, DEFAULT_SIGMA)
    }
}

fn median(samples: &[f32]) -> f32 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f32::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
