//! Report rendering.
//!
//! Fixed-width text table for the terminal and a JSON form for piping
//! elsewhere.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::strategy::{LayDecision, LayPlan};
use crate::types::{Bankroll, RankedPlayer, Skipped};

const NO_DATA: &str = "No valid player data.";

/// A ranked, staked field ready for output.
#[derive(Debug, Clone, Serialize)]
pub struct FieldReport {
    pub generated_at: DateTime<Utc>,
    pub bankroll: Bankroll,
    /// Sorted by delta descending.
    pub rows: Vec<RankedPlayer>,
    pub decisions: Vec<LayDecision>,
    /// Inputs dropped before planning, then records the planner set aside.
    pub skipped: Vec<Skipped>,
}

impl FieldReport {
    pub fn new(bankroll: Bankroll, plan: LayPlan, mut skipped: Vec<Skipped>) -> Self {
        skipped.extend(plan.skipped);
        Self {
            generated_at: Utc::now(),
            bankroll,
            rows: plan.rows,
            decisions: plan.decisions,
            skipped,
        }
    }

    /// Sum of liabilities over signalled rows.
    pub fn total_liability(&self) -> f64 {
        self.rows.iter().filter_map(|r| r.liability()).sum()
    }

    /// Fixed-width table, one row per player. Stake and liability are blank
    /// for players without a signal.
    pub fn render_table(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for FieldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            writeln!(f, "{NO_DATA}")?;
        } else {
            let header = format!(
                "{:<12}{:>5}{:>5}{:>5}{:>5}{:>6}{:>6}{:>8}{:>7}{:>7}{:>8}{:>8}{:>8}",
                "Player", "Sc", "Md%", "Mk%", "MPos", "MkPos", "Delta", "Signal", "Odds", "Edge",
                "EV", "Stake", "Liab"
            );
            writeln!(f, "{header}")?;
            writeln!(f, "{}", "-".repeat(header.len()))?;
            for row in &self.rows {
                writeln!(f, "{}", render_row(row))?;
            }
        }

        for s in &self.skipped {
            writeln!(f, "{s}")?;
        }
        Ok(())
    }
}

fn render_row(row: &RankedPlayer) -> String {
    let r = &row.record;
    let money = |v: Option<f64>| v.map(|x| format!("{x:.2}")).unwrap_or_default();
    let signal = row.signal.map(|s| s.to_string()).unwrap_or_default();
    format!(
        "{:<12}{:>5.0}{:>5.0}{:>5.0}{:>5}{:>6}{:>6}{:>8}{:>7.2}{:>7.2}{:>8.2}{:>8}{:>8}",
        r.name,
        r.score,
        r.model_pct,
        r.market_pct,
        row.model_rank,
        row.market_rank,
        row.delta,
        signal,
        r.live_odds,
        r.edge,
        r.ev,
        money(row.stake()),
        money(row.liability()),
    )
}
