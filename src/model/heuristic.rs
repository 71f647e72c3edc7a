//! Heuristic scoring.
//!
//! Combines weighted pre-event and in-play features into one raw score,
//! penalises the deficit to the leader, and normalises by field strength.

use tracing::debug;

use crate::config::ModelConfig;
use crate::types::PlayerFeatures;

/// Weight applied to each strokes-gained and form feature.
const FEATURE_WEIGHT: f64 = 0.5;
/// Points per stroke of over-performance against expectation.
const PRESSURE_WEIGHT: f64 = 15.0;
const LEADERBOARD_WEIGHT: f64 = 0.3;
const BASE_SCORE: f64 = 50.0;

/// Raw score → [0, 100] heuristic.
pub struct HeuristicScorer {
    shots_behind_scale: f64,
    course_fit_scale: f64,
}

impl HeuristicScorer {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            shots_behind_scale: config.shots_behind_scale,
            course_fit_scale: config.course_fit_scale,
        }
    }

    /// Weighted feature sum before the shots-behind penalty and field divisor.
    pub fn raw_score(&self, p: &PlayerFeatures) -> f64 {
        let pressure = (p.sg_true - p.sg_expected_pre) * PRESSURE_WEIGHT;

        BASE_SCORE
            + p.xwins
            + p.total_shots * FEATURE_WEIGHT
            + p.putt * FEATURE_WEIGHT
            + p.tee_to_green * FEATURE_WEIGHT
            + pressure
            + p.course_fit * self.course_fit_scale
            - p.ranking * FEATURE_WEIGHT
            - p.leaderboard_pos * LEADERBOARD_WEIGHT
            - p.avg_last5() * FEATURE_WEIGHT
            + p.sg_off_tee * FEATURE_WEIGHT
            + p.sg_approach * FEATURE_WEIGHT
            + p.sg_putting * FEATURE_WEIGHT
            + p.sg_around_green * FEATURE_WEIGHT
    }

    /// Deficit penalty; grows as fewer holes remain to recover.
    pub fn shots_behind_penalty(&self, shots_behind: f64, holes_left: u32) -> f64 {
        let holes = f64::from(holes_left.max(1));
        shots_behind / holes.sqrt() * self.shots_behind_scale
    }

    /// Final heuristic score, clamped to [0, 100].
    pub fn score(&self, p: &PlayerFeatures) -> f64 {
        let raw = self.raw_score(p);
        let penalty = self.shots_behind_penalty(p.shots_behind, p.holes_left);
        let adjusted = (raw - penalty) / p.field_quality.factor();
        let clamped = adjusted.clamp(0.0, 100.0);

        debug!(
            player = %p.name,
            raw = format!("{raw:.2}"),
            penalty = format!("{penalty:.3}"),
            field = %p.field_quality,
            score = format!("{clamped:.2}"),
            "Heuristic score"
        );

        clamped
    }
}
