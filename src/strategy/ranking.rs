//! Field ranking and rank-delta signals.
//!
//! Ranks a field twice, by market odds and by model probability, and flags
//! players the market rates above where the model has them.

use std::cmp::Ordering;

use crate::config::SignalConfig;
use crate::types::{PlayerRecord, Signal};

/// Market and model positions for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranks {
    pub market_rank: usize,
    pub model_rank: usize,
}

impl Ranks {
    /// Positive when the market has the player ahead of where the model
    /// does, which makes them a lay candidate.
    pub fn delta(&self) -> i64 {
        self.model_rank as i64 - self.market_rank as i64
    }
}

/// 1-based ranks of `keys` under `cmp`. Ties keep input order.
fn rank_by<F>(keys: &[f64], cmp: F) -> Vec<usize>
where
    F: Fn(f64, f64) -> Ordering,
{
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| cmp(keys[a], keys[b]));

    let mut ranks = vec![0; keys.len()];
    for (pos, idx) in order.into_iter().enumerate() {
        ranks[idx] = pos + 1;
    }
    ranks
}

/// Rank every record by odds ascending and model probability descending.
/// Output is in input order.
pub fn rank_field(records: &[PlayerRecord]) -> Vec<Ranks> {
    let odds: Vec<f64> = records.iter().map(|r| r.live_odds).collect();
    let model: Vec<f64> = records.iter().map(|r| r.model_pct).collect();

    let market_ranks = rank_by(&odds, |a, b| a.partial_cmp(&b).unwrap_or(Ordering::Equal));
    let model_ranks = rank_by(&model, |a, b| b.partial_cmp(&a).unwrap_or(Ordering::Equal));

    market_ranks
        .into_iter()
        .zip(model_ranks)
        .map(|(market_rank, model_rank)| Ranks { market_rank, model_rank })
        .collect()
}

/// Buckets a rank delta into a signal strength.
pub struct SignalClassifier {
    config: SignalConfig,
}

impl SignalClassifier {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// Strongest signal whose threshold `delta` reaches. Only positive
    /// deltas ever produce a signal.
    pub fn classify(&self, delta: i64) -> Option<Signal> {
        if delta <= 0 {
            return None;
        }
        Signal::ALL
            .iter()
            .copied()
            .find(|s| delta >= self.config.threshold_for(s))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(name: &str, model_pct: f64, odds: f64) -> PlayerRecord {
        PlayerRecord::new(name, 50.0, model_pct, 100.0 / odds, odds, 0.0)
    }

    #[test]
    fn test_three_player_field() {
        let records = vec![
            make_record("A", 20.0, 1.5),
            make_record("B", 50.0, 2.0),
            make_record("C", 40.0, 3.0),
        ];
        let ranks = rank_field(&records);
        let market: Vec<usize> = ranks.iter().map(|r| r.market_rank).collect();
        let model: Vec<usize> = ranks.iter().map(|r| r.model_rank).collect();
        let deltas: Vec<i64> = ranks.iter().map(|r| r.delta()).collect();
        assert_eq!(market, vec![1, 2, 3]);
        assert_eq!(model, vec![3, 1, 2]);
        assert_eq!(deltas, vec![2, -1, -1]);

        let classifier = SignalClassifier::new(SignalConfig::default());
        let signals: Vec<Option<Signal>> = deltas.iter().map(|&d| classifier.classify(d)).collect();
        assert_eq!(signals, vec![Some(Signal::Weak), None, None]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![
            make_record("A", 10.0, 5.0),
            make_record("B", 10.0, 5.0),
            make_record("C", 10.0, 5.0),
        ];
        let ranks = rank_field(&records);
        for (i, r) in ranks.iter().enumerate() {
            assert_eq!(r.market_rank, i + 1);
            assert_eq!(r.model_rank, i + 1);
            assert_eq!(r.delta(), 0);
        }
    }

    #[test]
    fn test_ranks_are_a_permutation() {
        let records: Vec<_> = [7.0, 3.0, 9.0, 3.0, 1.0, 12.0]
            .iter()
            .enumerate()
            .map(|(i, &m)| make_record(&format!("P{i}"), m, 2.0 + i as f64))
            .collect();
        let ranks = rank_field(&records);
        let mut model: Vec<usize> = ranks.iter().map(|r| r.model_rank).collect();
        model.sort_unstable();
        assert_eq!(model, vec![1, 2, 3, 4, 5, 6]);
        // Equal model values: earlier record ranks first.
        assert!(ranks[1].model_rank < ranks[3].model_rank);
    }

    #[test]
    fn test_empty_field() {
        assert!(rank_field(&[]).is_empty());
    }

    #[test]
    fn test_classify_thresholds() {
        let c = SignalClassifier::new(SignalConfig::default());
        assert_eq!(c.classify(7), Some(Signal::Strong));
        assert_eq!(c.classify(5), Some(Signal::Strong));
        assert_eq!(c.classify(4), Some(Signal::Medium));
        assert_eq!(c.classify(3), Some(Signal::Medium));
        assert_eq!(c.classify(2), Some(Signal::Weak));
        assert_eq!(c.classify(1), Some(Signal::Weak));
        assert_eq!(c.classify(0), None);
        assert_eq!(c.classify(-4), None);
    }

    #[test]
    fn test_negative_delta_never_signals() {
        // Model ranks the player at or ahead of the market: no lay,
        // regardless of magnitude.
        let c = SignalClassifier::new(SignalConfig::default());
        for d in -20..=0 {
            assert!(c.classify(d).is_none());
        }
    }
}
