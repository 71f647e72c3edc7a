//! Two-point logistic calibration.
//!
//! Fits `p(s) = 1 / (1 + exp(-a·(s - b)))` through two (score, probability)
//! anchors so that raw heuristic scores map onto win probabilities.

use crate::config::Anchor;

/// Log-odds of a probability.
fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// A fitted logistic curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticCurve {
    /// Slope.
    pub a: f64,
    /// Midpoint (score at which p = 0.5).
    pub b: f64,
}

impl LogisticCurve {
    /// Fit the curve through both anchors exactly.
    ///
    /// Anchors must have distinct scores and probabilities strictly inside
    /// (0, 1); `AppConfig::validate` guarantees this for configured anchors.
    pub fn fit(low: Anchor, high: Anchor) -> Self {
        let l1 = logit(low.probability);
        let l2 = logit(high.probability);
        let a = (l2 - l1) / (high.score - low.score);
        let b = low.score - l1 / a;
        Self { a, b }
    }

    /// Probability for a score.
    pub fn probability(&self, score: f64) -> f64 {
        1.0 / (1.0 + (-self.a * (score - self.b)).exp())
    }
}
