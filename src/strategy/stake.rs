//! Liability-capped lay staking.
//!
//! Each signal strength caps the liability at a fixed fraction of bankroll;
//! the lay stake is whatever risks exactly that liability at the given odds.

use tracing::debug;

use crate::config::StakingConfig;
use crate::types::{ApexError, Bankroll, Signal, StakeSize};

/// Converts a signal into a liability and a stake.
pub struct StakeSizer {
    config: StakingConfig,
}

impl StakeSizer {
    pub fn new(config: StakingConfig) -> Self {
        Self { config }
    }

    /// Maximum liability for a signal.
    pub fn liability(&self, signal: Signal, bankroll: Bankroll) -> f64 {
        self.config.cap_for(&signal) * bankroll.amount()
    }

    /// Size a lay at decimal `odds`.
    ///
    /// stake = liability / (odds - 1)
    ///
    /// No signal means nothing to size (`Ok(None)`), never a zero stake.
    /// Odds at or below 1.0 have no finite stake and are rejected.
    pub fn size(
        &self,
        signal: Option<Signal>,
        bankroll: Bankroll,
        odds: f64,
    ) -> Result<Option<StakeSize>, ApexError> {
        let Some(signal) = signal else {
            return Ok(None);
        };
        if !odds.is_finite() || odds <= 1.0 {
            return Err(ApexError::InvalidOdds(odds));
        }

        let liability = self.liability(signal, bankroll);
        let stake = liability / (odds - 1.0);

        debug!(
            signal = %signal,
            odds,
            liability = format!("{liability:.2}"),
            stake = format!("{stake:.2}"),
            "Lay sized"
        );

        Ok(Some(StakeSize { liability, stake }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
