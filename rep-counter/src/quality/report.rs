//! Running form-quality tally and its serializable report

use serde::{Deserialize, Serialize};

use super::checks::Finding;

/// Score of a rep that failed no check
pub const PERFECT_SCORE: u32 = 100;

/// Form summary of the session so far
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Mean per-rep score in [0, 100]; 100 before any rep was rated
    pub quality_score: f32,
    /// Reasons from the most recently rated rep, in check order
    pub feedback: Vec<String>,
    pub perfect_rep_count: u32,
    pub violation_count: u32,
    /// count × kcal_per_rep of the active exercise
    pub calories: f32,
    pub last_rep_score: Option<u32>,
}

/// Accumulates per-rep scores
#[derive(Clone, Debug, Default)]
pub(crate) struct ScoreTally {
    score_sum: u64,
    rated: u32,
    perfect: u32,
    violations: u32,
    feedback: Vec<String>,
    last_score: Option<u32>,
}

impl ScoreTally {
    /// Record one rep's findings and return its score
    pub fn record(&mut self, findings: Vec<Finding>) -> u32 {
        let deducted = findings
            .iter()
            .map(|f| f.deduction)
            .fold(0, u32::saturating_add);
        let score = PERFECT_SCORE.saturating_sub(deducted);

        self.score_sum += u64::from(score);
        self.rated += 1;
        if deducted == 0 {
            self.perfect += 1;
        } else {
            self.violations += 1;
        }
        self.feedback = findings.into_iter().map(|f| f.message).collect();
        self.last_score = Some(score);
        score
    }

    pub fn quality_score(&self) -> f32 {
        if self.rated == 0 {
            PERFECT_SCORE as f32
        } else {
            self.score_sum as f32 / self.rated as f32
        }
    }

    pub fn feedback(&self) -> &[String] {
        &self.feedback
    }

    pub fn report(&self, calories: f32) -> QualityReport {
        QualityReport {
            quality_score: self.quality_score(),
            feedback: self.feedback.clone(),
            perfect_rep_count: self.perfect,
            violation_count: self.violations,
            calories,
            last_rep_score: self.last_score,
        }
    }
}
