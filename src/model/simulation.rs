//! Monte Carlo round simulation.
//!
//! Estimates the probability that a player's score over the remaining holes
//! beats every rival's, given the current deficit and a projected
//! strokes-gained rate. Randomness comes only from the caller-supplied RNG,
//! so a seeded generator makes runs exactly reproducible.
//!
//! # Model
//!
//! Per trial, with `h = holes_left / 18`, using `rand_distr::Normal`:
//! 1. Player delta ~ Normal(-sg_expect_round · h, round_sd · √h)
//! 2. Each of `contenders - 1` rivals ~ Normal(0, round_sd · √h)
//! 3. Win when `shots_behind + player delta <= min(rival deltas)`

use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::config::SimulationConfig;
use crate::types::ApexError;

const HOLES_PER_ROUND: f64 = 18.0;

/// Round state fed to the simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundState {
    pub shots_behind: f64,
    pub holes_left: u32,
    /// Projected strokes-gained per 18 holes for the remainder.
    pub sg_expect_round: f64,
    /// Field size including the player.
    pub contenders: u32,
}

/// Monte Carlo win-probability estimator.
#[derive(Debug, Clone)]
pub struct RoundSimulator {
    trials: u32,
    round_sd: f64,
}

impl RoundSimulator {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            trials: config.trials.max(1),
            round_sd: config.round_sd,
        }
    }

    /// Estimated probability of finishing at or ahead of every rival.
    ///
    /// A lone contender has nobody to beat and wins with certainty. With no
    /// spread left (no holes remaining, or a zero round deviation) the
    /// outcome is decided by the expected deficit alone.
    pub fn simulate_win_prob<R: Rng + ?Sized>(
        &self,
        state: &RoundState,
        rng: &mut R,
    ) -> Result<f64, ApexError> {
        if state.contenders <= 1 {
            return Ok(1.0);
        }

        let rounds_left = f64::from(state.holes_left) / HOLES_PER_ROUND;
        let mean_delta = -(state.sg_expect_round * rounds_left);
        let sd = self.round_sd * rounds_left.sqrt();

        if sd == 0.0 {
            let level_or_ahead = state.shots_behind + mean_delta <= 0.0;
            return Ok(if level_or_ahead { 1.0 } else { 0.0 });
        }

        let bad_spread = |e: rand_distr::NormalError| {
            ApexError::Config(format!("round_sd {} gives no valid spread: {e}", self.round_sd))
        };
        let player = Normal::new(mean_delta, sd).map_err(bad_spread)?;
        let rival = Normal::new(0.0, sd).map_err(bad_spread)?;
        let rivals = state.contenders - 1;

        let mut wins: u32 = 0;
        for _ in 0..self.trials {
            let you = state.shots_behind + player.sample(rng);
            let mut best_rival = f64::INFINITY;
            for _ in 0..rivals {
                best_rival = best_rival.min(rival.sample(rng));
            }
            if you <= best_rival {
                wins += 1;
            }
        }

        let p = f64::from(wins) / f64::from(self.trials);
        debug!(
            shots_behind = state.shots_behind,
            holes_left = state.holes_left,
            sg_expect_round = format!("{:.3}", state.sg_expect_round),
            contenders = state.contenders,
            trials = self.trials,
            p_sim = format!("{:.4}", p),
            "Round simulation complete"
        );
        Ok(p)
    }
}
