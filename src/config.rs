//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section and key has a default, so a partial file (or none at
//! all, via `AppConfig::default()`) yields the calibrated model constants.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::types::{ApexError, Signal};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub simulation: SimulationConfig,
    pub signals: SignalConfig,
    pub staking: StakingConfig,
}

/// A (score, probability) point the logistic curve must pass through.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub score: f64,
    pub probability: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    pub anchor_low: Anchor,
    pub anchor_high: Anchor,
    /// Modelled probability never drops below this.
    pub probability_floor: f64,
    /// Cap on 1 / p_final.
    pub max_fair_odds: f64,
    pub shots_behind_scale: f64,
    /// Weight on the heuristic probability when blending with the simulation.
    pub blend_model_weight: f64,
    /// Weight on model fair odds when blending with the live price.
    pub fair_blend_weight: f64,
    pub total_holes: u32,
    /// Scale for course fit (0.05 → 5 points).
    pub course_fit_scale: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            anchor_low: Anchor { score: 20.0, probability: 0.0064 },
            anchor_high: Anchor { score: 60.0, probability: 0.10 },
            probability_floor: 0.02,
            max_fair_odds: 50.0,
            shots_behind_scale: 0.35,
            blend_model_weight: 0.6,
            fair_blend_weight: 0.7,
            total_holes: 72,
            course_fit_scale: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationConfig {
    pub trials: u32,
    /// Round-to-round score standard deviation per 18 holes.
    pub round_sd: f64,
    /// Fixed seed for reproducible runs. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 5000,
            round_sd: 2.4,
            seed: None,
        }
    }
}

/// Minimum rank delta for each signal strength.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SignalConfig {
    pub strong_delta: i64,
    pub medium_delta: i64,
    pub weak_delta: i64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            strong_delta: 5,
            medium_delta: 3,
            weak_delta: 1,
        }
    }
}

impl SignalConfig {
    /// Get the minimum delta for a given signal.
    pub fn threshold_for(&self, signal: &Signal) -> i64 {
        match signal {
            Signal::Strong => self.strong_delta,
            Signal::Medium => self.medium_delta,
            Signal::Weak => self.weak_delta,
        }
    }
}

/// Liability caps as a fraction of bankroll.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StakingConfig {
    pub strong_cap: f64,
    pub medium_cap: f64,
    pub weak_cap: f64,
    /// Bankroll used when none is given on the command line.
    pub bankroll: Option<f64>,
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            strong_cap: 0.10,
            medium_cap: 0.05,
            weak_cap: 0.025,
            bankroll: None,
        }
    }
}

impl StakingConfig {
    /// Get the liability cap for a given signal.
    pub fn cap_for(&self, signal: &Signal) -> f64 {
        match signal {
            Signal::Strong => self.strong_cap,
            Signal::Medium => self.medium_cap,
            Signal::Weak => self.weak_cap,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Pick the config for a run. A path the user named must exist; the
    /// default path may be absent, in which case the calibrated defaults
    /// apply.
    pub fn resolve(explicit: Option<&Path>, default_path: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(&path.to_string_lossy()),
            None if default_path.exists() => Self::load(&default_path.to_string_lossy()),
            None => {
                info!(path = %default_path.display(), "No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the model cannot work with.
    pub fn validate(&self) -> Result<(), ApexError> {
        let m = &self.model;
        for anchor in [m.anchor_low, m.anchor_high] {
            if !anchor.score.is_finite() {
                return Err(ApexError::Config(format!(
                    "anchor score {} must be finite",
                    anchor.score
                )));
            }
            if !(anchor.probability > 0.0 && anchor.probability < 1.0) {
                return Err(ApexError::Config(format!(
                    "anchor probability {} must lie strictly between 0 and 1",
                    anchor.probability
                )));
            }
        }
        if m.anchor_low.score == m.anchor_high.score {
            return Err(ApexError::Config("anchor scores must differ".into()));
        }
        if m.anchor_low.probability == m.anchor_high.probability {
            return Err(ApexError::Config("anchor probabilities must differ".into()));
        }
        if !(0.0..=1.0).contains(&m.blend_model_weight) || !(0.0..=1.0).contains(&m.fair_blend_weight) {
            return Err(ApexError::Config("blend weights must lie in [0, 1]".into()));
        }
        if !(m.max_fair_odds.is_finite() && m.max_fair_odds > 1.0) {
            return Err(ApexError::Config("max_fair_odds must be finite and exceed 1.0".into()));
        }
        if !(m.probability_floor >= 0.0 && m.probability_floor < 1.0) {
            return Err(ApexError::Config(format!(
                "probability_floor {} must lie in [0, 1)",
                m.probability_floor
            )));
        }
        for (name, scale) in [
            ("shots_behind_scale", m.shots_behind_scale),
            ("course_fit_scale", m.course_fit_scale),
        ] {
            if !scale.is_finite() {
                return Err(ApexError::Config(format!("{name} {scale} must be finite")));
            }
        }
        if m.total_holes == 0 {
            return Err(ApexError::Config("total_holes must be positive".into()));
        }
        if self.simulation.trials == 0 {
            return Err(ApexError::Config("simulation trials must be at least 1".into()));
        }
        if !(self.simulation.round_sd.is_finite() && self.simulation.round_sd >= 0.0) {
            return Err(ApexError::Config("round_sd must be finite and non-negative".into()));
        }
        let s = &self.signals;
        if !(s.strong_delta > s.medium_delta && s.medium_delta > s.weak_delta && s.weak_delta >= 1) {
            return Err(ApexError::Config(
                "signal deltas must satisfy strong > medium > weak >= 1".into(),
            ));
        }
        for signal in Signal::ALL {
            let cap = self.staking.cap_for(signal);
            if !(cap > 0.0 && cap <= 1.0) {
                return Err(ApexError::Config(format!(
                    "{signal} liability cap {cap} must lie in (0, 1]"
                )));
            }
        }
        Ok(())
    }
}
