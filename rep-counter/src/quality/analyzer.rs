//! FormQualityAnalyzer - optional scoring layer over ExerciseCounter
//!
//! Counting stays entirely inside the wrapped counter. The analyzer only
//! watches: when the count rises by one it starts following the rep, keeps
//! the frame at the deepest point of the counting phase, and rates the rep
//! once the angle turns back out of that phase.

use tracing::debug;

use super::checks::{run_checks, RepContext};
use super::report::{QualityReport, ScoreTally};
use crate::counter::{ExerciseCounter, Phase};
use crate::error::Result;
use crate::profile::Zone;
use crate::skeleton::Skeleton;

/// Angle extremes and deepest frame of the rep in progress
#[derive(Clone, Debug, Default)]
struct RepWindow {
    min_angle: Option<f32>,
    max_angle: Option<f32>,
    /// Counted but not yet rated
    pending: bool,
    /// (angle, skeleton) deepest inside the counting zone
    peak: Option<(f32, Skeleton)>,
}

impl RepWindow {
    fn track(&mut self, angle: f32, skeleton: &Skeleton, zone: Option<Zone>) {
        self.min_angle = Some(self.min_angle.map_or(angle, |m| m.min(angle)));
        self.max_angle = Some(self.max_angle.map_or(angle, |m| m.max(angle)));

        if !self.pending {
            return;
        }
        let deeper = match (self.peak.as_ref(), zone) {
            (None, _) => true,
            (Some(&(best, _)), Some(Zone::Below(_))) => angle < best,
            (Some(&(best, _)), Some(Zone::Above(_))) => angle > best,
            (Some(_), None) => false,
        };
        if deeper {
            self.peak = Some((angle, *skeleton));
        }
    }

    /// Next rep starts where this one ended
    fn restart(&mut self, angle: f32) {
        *self = Self {
            min_angle: Some(angle),
            max_angle: Some(angle),
            ..Self::default()
        };
    }
}

/// Exercise counter plus per-rep form scoring
pub struct FormQualityAnalyzer {
    counter: ExerciseCounter,
    rep: RepWindow,
    tally: ScoreTally,
}

impl FormQualityAnalyzer {
    pub fn new(counter: ExerciseCounter) -> Self {
        Self {
            counter,
            rep: RepWindow::default(),
            tally: ScoreTally::default(),
        }
    }

    /// Process a frame at the counter's clock time
    pub fn process(&mut self, exercise_id: &str, skeleton: &Skeleton) -> Result<Option<f32>> {
        let t = self.counter.now();
        self.process_at(exercise_id, skeleton, t)
    }

    /// Forward a frame to the counter and rate any rep it finished
    pub fn process_at(
        &mut self,
        exercise_id: &str,
        skeleton: &Skeleton,
        t: f64,
    ) -> Result<Option<f32>> {
        let switching = self.counter.exercise() != Some(exercise_id);
        let count_before = self.counter.counter();
        let phase_before = self.counter.phase();

        let angle = self.counter.process_at(exercise_id, skeleton, t)?;
        if switching {
            self.clear();
        }
        let Some(angle) = angle else {
            return Ok(None);
        };

        let (count_on, zone) = match self.counter.profile() {
            Some(profile) => {
                let count_on = profile.thresholds.count_on;
                (count_on, profile.thresholds.zone(count_on))
            }
            None => return Ok(Some(angle)),
        };

        let count = self.counter.counter();
        if !switching && count == count_before + 1 {
            if self.rep.pending {
                self.rate();
            }
            self.rep.pending = true;
            self.rep.peak = None;
        }

        self.rep.track(angle, skeleton, zone);

        let left_counting_phase = phase_before == count_on && self.counter.phase() != count_on;
        if self.rep.pending && left_counting_phase {
            self.rate();
            self.rep.restart(angle);
        }
        Ok(Some(angle))
    }

    /// Run the profile's checks on the pending rep
    fn rate(&mut self) {
        self.rep.pending = false;
        let (Some(profile), Some((_, peak))) = (self.counter.profile(), self.rep.peak.as_ref())
        else {
            return;
        };
        let ctx = RepContext {
            profile,
            skeleton: peak,
            min_confidence: self.counter.config().min_confidence,
            min_angle: self.rep.min_angle.unwrap_or(0.0),
            max_angle: self.rep.max_angle.unwrap_or(0.0),
        };
        let findings = run_checks(&ctx);
        let score = self.tally.record(findings);
        debug!(exercise = %profile.id, score, "rep rated");
    }

    fn clear(&mut self) {
        self.rep = RepWindow::default();
        self.tally = ScoreTally::default();
    }

    /// Reset the counter and the quality report
    pub fn reset(&mut self) {
        self.counter.reset();
        self.clear();
    }

    pub fn report(&self) -> QualityReport {
        let kcal = self.counter.profile().map_or(0.0, |p| p.kcal_per_rep);
        self.tally.report(self.counter.counter() as f32 * kcal)
    }

    pub fn quality_score(&self) -> f32 {
        self.tally.quality_score()
    }

    pub fn feedback(&self) -> &[String] {
        self.tally.feedback()
    }

    pub fn counter(&self) -> u32 {
        self.counter.counter()
    }

    pub fn phase(&self) -> Phase {
        self.counter.phase()
    }

    pub fn inner(&self) -> &ExerciseCounter {
        &self.counter
    }

    /// Direct access for selection and manual count correction
    pub fn inner_mut(&mut self) -> &mut ExerciseCounter {
        &mut self.counter
    }

    pub fn into_inner(self) -> ExerciseCounter {
        self.counter
    }
}

impl Default for FormQualityAnalyzer {
    fn default() -> Self {
        Self::new(ExerciseCounter::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::*;
    use approx::assert_relative_eq;

    /// Side-view squat: ankle straight below the knee, hip swings forward
    fn squat_pose(degrees: f32, knee_offset: f32) -> Skeleton {
        let rad = degrees.to_radians();
        let mut skeleton = Skeleton::default();
        for (hip, knee, ankle, x) in [
            (LEFT_HIP, LEFT_KNEE, LEFT_ANKLE, 200.0),
            (RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE, 400.0),
        ] {
            skeleton.set(ankle, Landmark::new(x, 400.0));
            skeleton.set(knee, Landmark::new(x + knee_offset, 300.0));
            skeleton.set(
                hip,
                Landmark::new(x + knee_offset + 100.0 * rad.sin(), 300.0 + 100.0 * rad.cos()),
            );
        }
        skeleton
    }

    /// Feed each angle for five frames, 1/30 s apart
    fn feed(analyzer: &mut FormQualityAnalyzer, angles: &[f32], knee_offset: f32, t: &mut f64) {
        for &angle in angles {
            for _ in 0..5 {
                analyzer.process_at("squat", &squat_pose(angle, knee_offset), *t).unwrap();
                *t += 1.0 / 30.0;
            }
        }
    }

    #[test]
    fn squat_pose_has_requested_angle() {
        let skeleton = squat_pose(80.0, 0.0);
        let angle = crate::kinematics::skeleton_angle(&skeleton, [LEFT_HIP, LEFT_KNEE, LEFT_ANKLE], 0.5).unwrap();
        assert_relative_eq!(angle, 80.0, epsilon = 0.01);
    }

    #[test]
    fn deep_clean_rep_is_perfect() {
        let mut analyzer = FormQualityAnalyzer::default();
        let mut t = 0.0;
        feed(&mut analyzer, &[170.0, 80.0, 170.0], 0.0, &mut t);

        assert_eq!(analyzer.counter(), 1);
        let report = analyzer.report();
        assert_eq!(report.perfect_rep_count, 1);
        assert_eq!(report.violation_count, 0);
        assert_relative_eq!(report.quality_score, 100.0);
        assert_relative_eq!(report.calories, 0.32);
    }

    #[test]
    fn shallow_rep_loses_depth_points() {
        let mut analyzer = FormQualityAnalyzer::default();
        let mut t = 0.0;
        feed(&mut analyzer, &[170.0, 105.0, 170.0], 0.0, &mut t);

        assert_eq!(analyzer.counter(), 1);
        let report = analyzer.report();
        assert_eq!(report.violation_count, 1);
        assert_eq!(report.last_rep_score, Some(90));
        assert_eq!(report.feedback.len(), 1);
        assert!(report.feedback[0].contains("deeper"));
    }

    #[test]
    fn findings_keep_check_order() {
        let mut analyzer = FormQualityAnalyzer::default();
        let mut t = 0.0;
        // Knees pushed 50 px sideways; bottom angle stays above 100°
        feed(&mut analyzer, &[170.0, 80.0, 170.0], 50.0, &mut t);

        assert_eq!(analyzer.counter(), 1);
        let report = analyzer.report();
        assert_eq!(report.last_rep_score, Some(75));
        assert_eq!(report.feedback.len(), 2);
        assert!(report.feedback[0].contains("knees"));
        assert!(report.feedback[1].contains("deeper"));
    }

    #[test]
    fn rep_is_not_rated_before_turnaround() {
        let mut analyzer = FormQualityAnalyzer::default();
        let mut t = 0.0;
        feed(&mut analyzer, &[170.0, 80.0], 0.0, &mut t);
        assert_eq!(analyzer.counter(), 1);
        assert_eq!(analyzer.report().last_rep_score, None);
    }

    #[test]
    fn manual_adjustment_does_not_rate() {
        let mut analyzer = FormQualityAnalyzer::default();
        let mut t = 0.0;
        feed(&mut analyzer, &[170.0], 0.0, &mut t);
        analyzer.inner_mut().adjust(1);
        feed(&mut analyzer, &[170.0], 0.0, &mut t);
        assert_eq!(analyzer.counter(), 1);
        assert_eq!(analyzer.report().perfect_rep_count, 0);
        assert_relative_eq!(analyzer.report().calories, 0.32);
    }

    #[test]
    fn reset_clears_report() {
        let mut analyzer = FormQualityAnalyzer::default();
        let mut t = 0.0;
        feed(&mut analyzer, &[170.0, 105.0, 170.0], 0.0, &mut t);
        analyzer.reset();
        let report = analyzer.report();
        assert_eq!(analyzer.counter(), 0);
        assert_eq!(report.violation_count, 0);
        assert!(report.feedback.is_empty());
        assert_relative_eq!(report.quality_score, 100.0);
    }

    #[test]
    fn switching_exercise_clears_report() {
        let mut analyzer = FormQualityAnalyzer::default();
        let mut t = 0.0;
        feed(&mut analyzer, &[170.0, 105.0, 170.0], 0.0, &mut t);
        analyzer.process_at("pushup", &Skeleton::default(), t).unwrap();
        assert_eq!(analyzer.report().violation_count, 0);
        assert_eq!(analyzer.inner().exercise(), Some("pushup"));
    }
}
