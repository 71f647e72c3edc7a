//! Probability model — heuristic scoring, logistic calibration, round
//! simulation, and blending into a market-comparable estimate.

pub mod blend;
pub mod heuristic;
pub mod logistic;
pub mod simulation;

use rand::Rng;
use tracing::{debug, info};

use crate::config::{AppConfig, ModelConfig};
use crate::types::{ApexError, PlayerFeatures, ScoreResult};
use blend::{project_remaining_sg, ProbabilityBlender};
use heuristic::HeuristicScorer;
use logistic::LogisticCurve;
use simulation::{RoundSimulator, RoundState};

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Pipelines heuristic score → logistic probability → simulation → blend.
///
/// Build once per process: the logistic curve is fitted in `new` and reused
/// for every player scored.
pub struct ScoringModel {
    curve: LogisticCurve,
    scorer: HeuristicScorer,
    simulator: RoundSimulator,
    blender: ProbabilityBlender,
    probability_floor: f64,
    total_holes: u32,
}

impl ScoringModel {
    pub fn new(config: &AppConfig) -> Self {
        let m: &ModelConfig = &config.model;
        let curve = LogisticCurve::fit(m.anchor_low, m.anchor_high);
        debug!(a = curve.a, b = curve.b, "Logistic curve fitted");
        Self {
            curve,
            scorer: HeuristicScorer::new(m),
            simulator: RoundSimulator::new(&config.simulation),
            blender: ProbabilityBlender::new(m),
            probability_floor: m.probability_floor,
            total_holes: m.total_holes,
        }
    }

    /// The fitted calibration curve.
    pub fn curve(&self) -> &LogisticCurve {
        &self.curve
    }

    /// Floor-bounded probability for a heuristic score.
    pub fn model_probability(&self, score: f64) -> f64 {
        self.curve.probability(score).max(self.probability_floor)
    }

    /// Score one player end to end.
    ///
    /// Features are validated first; any invalid field aborts the run.
    pub fn score_player<R: Rng + ?Sized>(
        &self,
        features: &PlayerFeatures,
        rng: &mut R,
    ) -> Result<ScoreResult, ApexError> {
        features.validate(self.total_holes)?;

        let score = self.scorer.score(features);
        let p_model = self.model_probability(score);

        let sg_remaining = project_remaining_sg(features, self.total_holes);
        let p_sim = self.simulator.simulate_win_prob(
            &RoundState {
                shots_behind: features.shots_behind,
                holes_left: features.holes_left,
                sg_expect_round: sg_remaining,
                contenders: features.contenders,
            },
            rng,
        )?;

        let p_final = self.blender.blend(p_model, p_sim);
        let market = self.blender.compare(p_final, features.live_odds);

        info!(
            player = %features.name,
            score = format!("{score:.2}"),
            p_model = format!("{:.2}%", p_model * 100.0),
            p_sim = format!("{:.2}%", p_sim * 100.0),
            p_final = format!("{:.2}%", p_final * 100.0),
            edge = format!("{:+.2}%", market.edge * 100.0),
            "Player scored"
        );

        Ok(ScoreResult {
            name: features.name.clone(),
            score,
            p_model,
            p_sim,
            p_final,
            p_implied: market.p_implied,
            edge: market.edge,
            fair_model: market.fair_model,
            fair_blend: market.fair_blend,
            live_odds: features.live_odds,
            ev_back: market.ev_back,
        })
    }

    /// Score a batch, keeping failures alongside successes in input order.
    pub fn score_all<R: Rng + ?Sized>(
        &self,
        players: &[PlayerFeatures],
        rng: &mut R,
    ) -> Vec<(String, Result<ScoreResult, ApexError>)> {
        players
            .iter()
            .map(|p| (p.name.clone(), self.score_player(p, rng)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_model() -> ScoringModel {
        ScoringModel::new(&AppConfig {
            simulation: SimulationConfig {
                trials: 2000,
                ..SimulationConfig::default()
            },
            ..AppConfig::default()
        })
    }

    #[test]
    fn test_model_probability_floor_and_bounds() {
        let model = make_model();
        let mut prev = 0.0;
        for s in 0..=100 {
            let p = model.model_probability(s as f64);
            assert!(p >= 0.02 && p <= 1.0, "p({s}) = {p}");
            assert!(p >= prev);
            prev = p;
        }
        // Curve values under the floor report the floor.
        assert_eq!(model.model_probability(0.0), 0.02);
        assert_eq!(model.model_probability(20.0), 0.02);
        assert!((model.model_probability(60.0) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_curve_reproduces_anchors() {
        let model = make_model();
        assert!((model.curve().probability(20.0) - 0.0064).abs() < 1e-12);
        assert!((model.curve().probability(60.0) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_score_player_consistent_fields() {
        let model = make_model();
        let p = PlayerFeatures::sample();
        let r = model
            .score_player(&p, &mut StdRng::seed_from_u64(21))
            .unwrap();
        assert_eq!(r.name, "Sample");
        assert!(r.score >= 0.0 && r.score <= 100.0);
        assert!(r.p_model >= 0.02);
        assert!(r.p_sim >= 0.0 && r.p_sim <= 1.0);
        assert!((r.p_final - (0.6 * r.p_model + 0.4 * r.p_sim)).abs() < 1e-12);
        assert!((r.p_implied - 1.0 / 12.0).abs() < 1e-12);
        assert!((r.edge - (r.p_final - r.p_implied)).abs() < 1e-12);
        assert!(r.fair_model <= 50.0);
        assert!((r.ev_back - (r.p_final * 11.0 - (1.0 - r.p_final))).abs() < 1e-12);
    }

    #[test]
    fn test_score_player_reproducible_with_seed() {
        let model = make_model();
        let p = PlayerFeatures::sample();
        let a = model.score_player(&p, &mut StdRng::seed_from_u64(8)).unwrap();
        let b = model.score_player(&p, &mut StdRng::seed_from_u64(8)).unwrap();
        assert_eq!(a.p_sim, b.p_sim);
        assert_eq!(a.p_final, b.p_final);
    }

    #[test]
    fn test_lone_contender_sim_is_certain() {
        let model = make_model();
        let mut p = PlayerFeatures::sample();
        p.contenders = 1;
        let r = model.score_player(&p, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(r.p_sim, 1.0);
    }

    #[test]
    fn test_invalid_features_abort() {
        let model = make_model();
        let mut p = PlayerFeatures::sample();
        p.live_odds = 0.9;
        let result = model.score_player(&p, &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(ApexError::InvalidOdds(_))));
    }

    #[test]
    fn test_score_all_keeps_order_and_failures() {
        let model = make_model();
        let good = PlayerFeatures::sample();
        let mut bad = PlayerFeatures::sample();
        bad.name = "Bad".into();
        bad.contenders = 0;
        let results = model.score_all(&[good, bad], &mut StdRng::seed_from_u64(2));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "Sample");
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, "Bad");
        assert!(results[1].1.is_err());
    }
}
