//! Strategy engine — field ranking, rank-delta signals, and lay staking.

pub mod ranking;
pub mod stake;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::types::{ApexError, Bankroll, PlayerRecord, RankedPlayer, Signal, Skipped, StakeSize};
use ranking::{rank_field, SignalClassifier};
use stake::StakeSizer;

// ---------------------------------------------------------------------------
// Decision log
// ---------------------------------------------------------------------------

/// Record of every decision made during a planning pass, including
/// players passed over and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum LayDecision {
    /// Signal raised and a lay sized.
    Staked {
        name: String,
        signal: Signal,
        sizing: StakeSize,
    },
    /// Delta too small (or non-positive) for any signal.
    NoSignal { name: String, delta: i64 },
    /// Record left out of ranking.
    Invalid { name: String, reason: String },
}

/// Output of one planning pass.
#[derive(Debug, Clone, Default)]
pub struct LayPlan {
    /// Sorted by delta descending.
    pub rows: Vec<RankedPlayer>,
    /// Input order; invalid records first.
    pub decisions: Vec<LayDecision>,
    pub skipped: Vec<Skipped>,
}

impl LayPlan {
    pub fn signal_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d, LayDecision::Staked { .. }))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Pipelines ranking → signal classification → stake sizing for a field.
pub struct LayPlanner {
    classifier: SignalClassifier,
    sizer: StakeSizer,
}

impl LayPlanner {
    pub fn new(classifier: SignalClassifier, sizer: StakeSizer) -> Self {
        Self { classifier, sizer }
    }

    /// Build from application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            SignalClassifier::new(config.signals.clone()),
            StakeSizer::new(config.staking.clone()),
        )
    }

    /// Run the full pipeline over a field.
    ///
    /// Steps:
    /// 1. Set aside records with unusable numbers; the rest are ranked alone.
    /// 2. Rank by odds (market) and by model probability.
    /// 3. Classify each rank delta.
    /// 4. Size a lay for every signalled player.
    /// 5. Order rows by delta descending; equal deltas keep input order.
    ///
    /// A bad record never costs the rest of the field its rows.
    pub fn plan(&self, records: &[PlayerRecord], bankroll: Bankroll) -> LayPlan {
        let mut plan = LayPlan::default();

        let mut valid = Vec::with_capacity(records.len());
        for record in records {
            match check_record(record) {
                Ok(()) => valid.push(record.clone()),
                Err(e) => set_aside(&mut plan, &record.name, e),
            }
        }

        let ranks = rank_field(&valid);
        for (record, r) in valid.into_iter().zip(ranks) {
            let delta = r.delta();
            let signal = self.classifier.classify(delta);
            let sizing = match self.sizer.size(signal, bankroll, record.live_odds) {
                Ok(sizing) => sizing,
                Err(e) => {
                    set_aside(&mut plan, &record.name, e);
                    continue;
                }
            };

            match (signal, sizing) {
                (Some(signal), Some(sizing)) => {
                    info!(
                        player = %record.name,
                        signal = %signal,
                        delta,
                        odds = record.live_odds,
                        liability = format!("{:.2}", sizing.liability),
                        stake = format!("{:.2}", sizing.stake),
                        "Lay signalled"
                    );
                    plan.decisions.push(LayDecision::Staked {
                        name: record.name.clone(),
                        signal,
                        sizing,
                    });
                }
                _ => {
                    debug!(player = %record.name, delta, "No signal");
                    plan.decisions.push(LayDecision::NoSignal {
                        name: record.name.clone(),
                        delta,
                    });
                }
            }

            plan.rows.push(RankedPlayer {
                record,
                market_rank: r.market_rank,
                model_rank: r.model_rank,
                delta,
                signal,
                sizing,
            });
        }

        plan.rows.sort_by(|a, b| b.delta.cmp(&a.delta));

        info!(
            players = plan.rows.len(),
            signals = plan.signal_count(),
            skipped = plan.skipped.len(),
            bankroll = %bankroll,
            "Lay plan complete"
        );

        plan
    }
}

/// Log a record as invalid and list it with the skipped inputs.
fn set_aside(plan: &mut LayPlan, name: &str, error: ApexError) {
    warn!(player = %name, error = %error, "Record left out of lay plan");
    let reason = error.to_string();
    plan.decisions.push(LayDecision::Invalid {
        name: name.to_string(),
        reason: reason.clone(),
    });
    plan.skipped.push(Skipped::player(name, reason));
}

/// Ranking needs finite numbers and a layable price.
fn check_record(record: &PlayerRecord) -> Result<(), ApexError> {
    if !record.live_odds.is_finite() || record.live_odds <= 1.0 {
        return Err(ApexError::InvalidOdds(record.live_odds));
    }
    let numbers = [
        ("score", record.score),
        ("model_pct", record.model_pct),
        ("market_pct", record.market_pct),
        ("ev", record.ev),
    ];
    for (field, value) in numbers {
        if !value.is_finite() {
            return Err(ApexError::InvalidFeature {
                field,
                reason: format!("{value} is not a finite number"),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
