//! Probability blending and market comparison.
//!
//! Projects the rest-of-tournament strokes-gained rate from live data,
//! blends heuristic and simulated probabilities, and prices the result
//! against the live market.

use crate::config::ModelConfig;
use crate::types::PlayerFeatures;

/// Weight on pre-event expectation vs. the live in-play rate.
const PRE_EVENT_WEIGHT: f64 = 0.5;

/// Strokes-gained projection for the remaining holes.
///
/// Before a hole is played the pre-event expectation stands alone; after
/// that, it is averaged with the live per-hole rate extrapolated over the
/// holes left.
pub fn project_remaining_sg(p: &PlayerFeatures, total_holes: u32) -> f64 {
    let holes_played = total_holes.saturating_sub(p.holes_left);
    if holes_played > 0 {
        let sg_rate = p.sg_in_play() / f64::from(holes_played);
        PRE_EVENT_WEIGHT * p.sg_expected_pre
            + (1.0 - PRE_EVENT_WEIGHT) * (sg_rate * f64::from(p.holes_left))
    } else {
        p.sg_expected_pre
    }
}

/// Market-facing figures derived from a final probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketComparison {
    pub p_implied: f64,
    pub edge: f64,
    pub fair_model: f64,
    pub fair_blend: f64,
    pub ev_back: f64,
}

/// Blends model and simulation, then compares with the market.
#[derive(Debug, Clone)]
pub struct ProbabilityBlender {
    blend_model_weight: f64,
    fair_blend_weight: f64,
    max_fair_odds: f64,
}

impl ProbabilityBlender {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            blend_model_weight: config.blend_model_weight,
            fair_blend_weight: config.fair_blend_weight,
            max_fair_odds: config.max_fair_odds,
        }
    }

    /// Weighted blend of heuristic and simulated probabilities.
    pub fn blend(&self, p_model: f64, p_sim: f64) -> f64 {
        self.blend_model_weight * p_model + (1.0 - self.blend_model_weight) * p_sim
    }

    /// Fair odds for a probability, capped at `max_fair_odds`.
    pub fn fair_odds(&self, p_final: f64) -> f64 {
        if p_final <= 0.0 {
            return self.max_fair_odds;
        }
        (1.0 / p_final).min(self.max_fair_odds)
    }

    /// Compare a final probability with decimal `live_odds` (> 1.0).
    pub fn compare(&self, p_final: f64, live_odds: f64) -> MarketComparison {
        let p_implied = 1.0 / live_odds;
        let fair_model = self.fair_odds(p_final);
        MarketComparison {
            p_implied,
            edge: p_final - p_implied,
            fair_model,
            fair_blend: self.fair_blend_weight * fair_model
                + (1.0 - self.fair_blend_weight) * live_odds,
            ev_back: p_final * (live_odds - 1.0) - (1.0 - p_final),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blender() -> ProbabilityBlender {
        ProbabilityBlender::new(&ModelConfig::default())
    }

    #[test]
    fn test_projection_before_first_hole() {
        let mut p = PlayerFeatures::sample();
        p.holes_left = 72;
        assert_eq!(project_remaining_sg(&p, 72), p.sg_expected_pre);
    }

    #[test]
    fn test_projection_mixes_live_rate() {
        let p = PlayerFeatures::sample(); // 36 played, 36 left, 1.6 SG so far
        let rate = 1.6 / 36.0;
        let expected = 0.5 * 1.0 + 0.5 * (rate * 36.0);
        assert!((project_remaining_sg(&p, 72) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_projection_final_hole_done() {
        let mut p = PlayerFeatures::sample();
        p.holes_left = 0;
        // No holes left: live term vanishes.
        assert!((project_remaining_sg(&p, 72) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_blend_weights() {
        let b = blender();
        assert!((b.blend(0.10, 0.20) - 0.14).abs() < 1e-12);
        assert!((b.blend(0.02, 0.0) - 0.012).abs() < 1e-12);
    }

    #[test]
    fn test_fair_odds_capped() {
        let b = blender();
        assert_eq!(b.fair_odds(0.005), 50.0);
        assert!((b.fair_odds(0.25) - 4.0).abs() < 1e-12);
        assert_eq!(b.fair_odds(0.0), 50.0);
    }

    #[test]
    fn test_compare_with_market() {
        let b = blender();
        let c = b.compare(0.20, 4.0);
        assert!((c.p_implied - 0.25).abs() < 1e-12);
        assert!((c.edge + 0.05).abs() < 1e-12);
        assert!((c.fair_model - 5.0).abs() < 1e-12);
        assert!((c.fair_blend - (0.7 * 5.0 + 0.3 * 4.0)).abs() < 1e-12);
        // 0.2 * 3 - 0.8
        assert!((c.ev_back + 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_positive_ev_when_model_beats_price() {
        let c = blender().compare(0.20, 8.0);
        assert!(c.edge > 0.0);
        assert!((c.ev_back - 0.6).abs() < 1e-12);
    }
}
