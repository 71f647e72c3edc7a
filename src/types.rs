//! Shared types for ODDS APEX.
//!
//! These types form the data model used across all modules.
//! The model layer produces `ScoreResult`s from `PlayerFeatures`; the
//! strategy layer consumes `PlayerRecord`s and emits `RankedPlayer`s.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Field quality
// ---------------------------------------------------------------------------

/// Strength of the tournament field. Divides the raw heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldQuality {
    Weak,
    #[default]
    Average,
    Strong,
}

impl FieldQuality {
    /// All known field qualities (useful for iteration).
    pub const ALL: &'static [FieldQuality] = &[
        FieldQuality::Weak,
        FieldQuality::Average,
        FieldQuality::Strong,
    ];

    /// Score divisor for this field.
    pub fn factor(&self) -> f64 {
        match self {
            FieldQuality::Weak => 0.9,
            FieldQuality::Average => 1.0,
            FieldQuality::Strong => 1.1,
        }
    }
}

impl fmt::Display for FieldQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldQuality::Weak => write!(f, "weak"),
            FieldQuality::Average => write!(f, "average"),
            FieldQuality::Strong => write!(f, "strong"),
        }
    }
}

/// Parse a field quality (case-insensitive).
impl std::str::FromStr for FieldQuality {
    type Err = ApexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weak" => Ok(FieldQuality::Weak),
            "average" | "avg" => Ok(FieldQuality::Average),
            "strong" => Ok(FieldQuality::Strong),
            _ => Err(ApexError::InvalidFeature {
                field: "field_quality",
                reason: format!("unknown field quality: {s}"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Player features
// ---------------------------------------------------------------------------

/// Pre-event and in-play attributes for one golfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerFeatures {
    pub name: String,
    /// Expected wins.
    pub xwins: f64,
    /// Total strokes-gained.
    pub total_shots: f64,
    pub putt: f64,
    pub tee_to_green: f64,
    pub sg_true: f64,
    pub sg_expected_pre: f64,
    pub course_fit: f64,
    pub ranking: f64,
    pub leaderboard_pos: f64,
    /// Most recent five finishing positions.
    pub last5_finishes: [f64; 5],
    /// Decimal odds (> 1.0).
    pub live_odds: f64,
    /// Strokes behind the leader.
    pub shots_behind: f64,

    // In-play strokes-gained
    pub sg_off_tee: f64,
    pub sg_approach: f64,
    pub sg_putting: f64,
    pub sg_around_green: f64,

    // Round state
    pub holes_left: u32,
    pub contenders: u32,
    #[serde(default)]
    pub field_quality: FieldQuality,
}

impl PlayerFeatures {
    /// Check every field against its constraints.
    /// Fails on the first offending field.
    pub fn validate(&self, total_holes: u32) -> Result<(), ApexError> {
        let scalars = [
            ("xwins", self.xwins),
            ("total_shots", self.total_shots),
            ("putt", self.putt),
            ("tee_to_green", self.tee_to_green),
            ("sg_true", self.sg_true),
            ("sg_expected_pre", self.sg_expected_pre),
            ("course_fit", self.course_fit),
            ("ranking", self.ranking),
            ("leaderboard_pos", self.leaderboard_pos),
            ("shots_behind", self.shots_behind),
            ("sg_off_tee", self.sg_off_tee),
            ("sg_approach", self.sg_approach),
            ("sg_putting", self.sg_putting),
            ("sg_around_green", self.sg_around_green),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(ApexError::InvalidFeature {
                    field,
                    reason: format!("not a finite number: {value}"),
                });
            }
        }
        if self.last5_finishes.iter().any(|f| !f.is_finite()) {
            return Err(ApexError::InvalidFeature {
                field: "last5_finishes",
                reason: "all five finishes must be finite numbers".into(),
            });
        }
        if !self.live_odds.is_finite() || self.live_odds <= 1.0 {
            return Err(ApexError::InvalidOdds(self.live_odds));
        }
        if self.holes_left > total_holes {
            return Err(ApexError::InvalidFeature {
                field: "holes_left",
                reason: format!("{} exceeds the {total_holes} holes in a tournament", self.holes_left),
            });
        }
        if self.contenders < 1 {
            return Err(ApexError::InvalidFeature {
                field: "contenders",
                reason: "at least one contender (the player) is required".into(),
            });
        }
        Ok(())
    }

    /// Mean of the last five finishes.
    pub fn avg_last5(&self) -> f64 {
        self.last5_finishes.iter().sum::<f64>() / self.last5_finishes.len() as f64
    }

    /// Sum of the four in-play strokes-gained components.
    pub fn sg_in_play(&self) -> f64 {
        self.sg_off_tee + self.sg_approach + self.sg_putting + self.sg_around_green
    }

    /// Helper to build a test/sample player with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        PlayerFeatures {
            name: "Sample".to_string(),
            xwins: 2.0,
            total_shots: 1.5,
            putt: 0.4,
            tee_to_green: 1.1,
            sg_true: 1.2,
            sg_expected_pre: 1.0,
            course_fit: 0.05,
            ranking: 10.0,
            leaderboard_pos: 5.0,
            last5_finishes: [10.0, 20.0, 5.0, 15.0, 30.0],
            live_odds: 12.0,
            shots_behind: 3.0,
            sg_off_tee: 0.5,
            sg_approach: 0.8,
            sg_putting: 0.2,
            sg_around_green: 0.1,
            holes_left: 36,
            contenders: 20,
            field_quality: FieldQuality::Average,
        }
    }
}

// ---------------------------------------------------------------------------
// Score result
// ---------------------------------------------------------------------------

/// Everything the model derives for one player in one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    pub name: String,
    /// Raw heuristic score, clamped to [0, 100].
    pub score: f64,
    /// Logistic probability of the score (floor-bounded).
    pub p_model: f64,
    /// Monte Carlo win probability.
    pub p_sim: f64,
    /// Blend of `p_model` and `p_sim`.
    pub p_final: f64,
    /// 1 / live odds.
    pub p_implied: f64,
    /// p_final - p_implied
    pub edge: f64,
    /// 1 / p_final, capped.
    pub fair_model: f64,
    /// Fair odds blended toward the live price.
    pub fair_blend: f64,
    pub live_odds: f64,
    /// Expected value per unit backed.
    pub ev_back: f64,
}

impl ScoreResult {
    /// Convert to a batch record (probabilities become percentages).
    pub fn to_record(&self) -> PlayerRecord {
        PlayerRecord::new(
            self.name.clone(),
            self.score,
            self.p_final * 100.0,
            self.p_implied * 100.0,
            self.live_odds,
            self.ev_back,
        )
    }
}

impl fmt::Display for ScoreResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  |  Score: {:6.2}  Model: {:6.2}%  Market: {:6.2}%  Edge: {:+5.2}%  FairOdds: {:5.2}  LiveOdds: {:4.2}  EV: {:+.3}",
            self.name,
            self.score,
            self.p_final * 100.0,
            self.p_implied * 100.0,
            self.edge * 100.0,
            self.fair_blend,
            self.live_odds,
            self.ev_back,
        )
    }
}

// ---------------------------------------------------------------------------
// Batch records
// ---------------------------------------------------------------------------

/// One player in a ranking batch. Percentages are in 0–100 units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub score: f64,
    pub model_pct: f64,
    pub market_pct: f64,
    pub live_odds: f64,
    /// Signed expected value.
    pub ev: f64,
    /// model_pct - market_pct
    pub edge: f64,
}

impl PlayerRecord {
    pub fn new(
        name: impl Into<String>,
        score: f64,
        model_pct: f64,
        market_pct: f64,
        live_odds: f64,
        ev: f64,
    ) -> Self {
        Self {
            name: name.into(),
            score,
            model_pct,
            market_pct,
            live_odds,
            ev,
            edge: model_pct - market_pct,
        }
    }
}

/// Strength of a rank-delta divergence. Absence of a signal is `None`
/// at the use site, not a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Strong,
    Medium,
    Weak,
}

impl Signal {
    pub const ALL: &'static [Signal] = &[Signal::Strong, Signal::Medium, Signal::Weak];
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Strong => write!(f, "Strong"),
            Signal::Medium => write!(f, "Medium"),
            Signal::Weak => write!(f, "Weak"),
        }
    }
}

/// Liability cap and the lay stake it implies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakeSize {
    pub liability: f64,
    pub stake: f64,
}

/// A record after ranking, classification and sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub record: PlayerRecord,
    /// 1 = shortest odds.
    pub market_rank: usize,
    /// 1 = highest model probability.
    pub model_rank: usize,
    /// model_rank - market_rank
    pub delta: i64,
    pub signal: Option<Signal>,
    /// Present exactly when `signal` is.
    pub sizing: Option<StakeSize>,
}

impl RankedPlayer {
    pub fn stake(&self) -> Option<f64> {
        self.sizing.map(|s| s.stake)
    }

    pub fn liability(&self) -> Option<f64> {
        self.sizing.map(|s| s.liability)
    }
}

// ---------------------------------------------------------------------------
// Skipped input
// ---------------------------------------------------------------------------

/// Where a dropped input came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipSource {
    /// 1-based line of pasted batch text.
    Line(usize),
    /// A named player that could not be scored or planned.
    Player(String),
}

impl fmt::Display for SkipSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipSource::Line(n) => write!(f, "line {n}"),
            SkipSource::Player(name) => write!(f, "player {name}"),
        }
    }
}

/// An input left out of the report, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skipped {
    pub source: SkipSource,
    pub reason: String,
}

impl Skipped {
    pub fn line(line_no: usize, reason: impl Into<String>) -> Self {
        Self {
            source: SkipSource::Line(line_no),
            reason: reason.into(),
        }
    }

    pub fn player(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: SkipSource::Player(name.into()),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skipped {}: {}", self.source, self.reason)
    }
}

// ---------------------------------------------------------------------------
// Bankroll
// ---------------------------------------------------------------------------

/// A validated, strictly positive bankroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bankroll(f64);

impl Bankroll {
    pub fn new(amount: f64) -> Result<Self, ApexError> {
        if amount.is_finite() && amount > 0.0 {
            Ok(Self(amount))
        } else {
            Err(ApexError::InvalidBankroll(amount.to_string()))
        }
    }

    pub fn amount(&self) -> f64 {
        self.0
    }

    /// Command-line text wins over the configured amount. Never defaulted
    /// when both are absent.
    pub fn resolve(arg: Option<&str>, configured: Option<f64>) -> Result<Self, ApexError> {
        match (arg, configured) {
            (Some(text), _) => text.parse(),
            (None, Some(amount)) => Bankroll::new(amount),
            (None, None) => Err(ApexError::MissingBankroll),
        }
    }
}

impl std::str::FromStr for Bankroll {
    type Err = ApexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let amount: f64 = trimmed
            .parse()
            .map_err(|_| ApexError::InvalidBankroll(trimmed.to_string()))?;
        Bankroll::new(amount)
    }
}

impl fmt::Display for Bankroll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for ODDS APEX.
#[derive(Debug, thiserror::Error)]
pub enum ApexError {
    #[error("Invalid bankroll '{0}': enter a positive amount")]
    InvalidBankroll(String),

    #[error("No bankroll given: pass --bankroll or set staking.bankroll")]
    MissingBankroll,

    #[error("Invalid decimal odds {0}: must be greater than 1.0")]
    InvalidOdds(f64),

    #[error("Invalid {field}: {reason}")]
    InvalidFeature { field: &'static str, reason: String },

    #[error("Line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- FieldQuality tests --

    #[test]
    fn test_field_quality_factors() {
        assert_eq!(FieldQuality::Weak.factor(), 0.9);
        assert_eq!(FieldQuality::Average.factor(), 1.0);
        assert_eq!(FieldQuality::Strong.factor(), 1.1);
        assert!(FieldQuality::ALL.iter().all(|q| q.factor() > 0.0));
    }

    #[test]
    fn test_field_quality_from_str() {
        assert_eq!("weak".parse::<FieldQuality>().unwrap(), FieldQuality::Weak);
        assert_eq!("STRONG".parse::<FieldQuality>().unwrap(), FieldQuality::Strong);
        assert_eq!(" average ".parse::<FieldQuality>().unwrap(), FieldQuality::Average);
        assert!("elite".parse::<FieldQuality>().is_err());
    }

    #[test]
    fn test_field_quality_deserializes_lowercase() {
        let q: FieldQuality = serde_json::from_str("\"strong\"").unwrap();
        assert_eq!(q, FieldQuality::Strong);
        assert_eq!(serde_json::to_string(&FieldQuality::Weak).unwrap(), "\"weak\"");
    }

    // -- PlayerFeatures tests --

    #[test]
    fn test_sample_features_validate() {
        assert!(PlayerFeatures::sample().validate(72).is_ok());
    }

    #[test]
    fn test_odds_of_one_rejected() {
        let mut p = PlayerFeatures::sample();
        p.live_odds = 1.0;
        assert!(matches!(p.validate(72), Err(ApexError::InvalidOdds(_))));
    }

    #[test]
    fn test_holes_left_above_total_rejected() {
        let mut p = PlayerFeatures::sample();
        p.holes_left = 73;
        let err = p.validate(72).unwrap_err();
        assert!(matches!(err, ApexError::InvalidFeature { field: "holes_left", .. }));
    }

    #[test]
    fn test_zero_contenders_rejected() {
        let mut p = PlayerFeatures::sample();
        p.contenders = 0;
        let err = p.validate(72).unwrap_err();
        assert!(matches!(err, ApexError::InvalidFeature { field: "contenders", .. }));
    }

    #[test]
    fn test_non_finite_feature_rejected() {
        let mut p = PlayerFeatures::sample();
        p.putt = f64::NAN;
        let err = p.validate(72).unwrap_err();
        assert!(matches!(err, ApexError::InvalidFeature { field: "putt", .. }));
    }

    #[test]
    fn test_avg_last5_and_in_play_sum() {
        let p = PlayerFeatures::sample();
        assert!((p.avg_last5() - 16.0).abs() < 1e-12);
        assert!((p.sg_in_play() - 1.6).abs() < 1e-12);
    }

    // -- Record tests --

    #[test]
    fn test_record_edge_is_model_minus_market() {
        let r = PlayerRecord::new("Tiger", 55.0, 12.0, 10.0, 8.0, 0.25);
        assert_eq!(r.edge, 2.0);
    }

    #[test]
    fn test_score_result_to_record_uses_percentages() {
        let s = ScoreResult {
            name: "Rory".into(),
            score: 48.0,
            p_model: 0.05,
            p_sim: 0.10,
            p_final: 0.07,
            p_implied: 0.05,
            edge: 0.02,
            fair_model: 1.0 / 0.07,
            fair_blend: 0.7 / 0.07 + 0.3 * 20.0,
            live_odds: 20.0,
            ev_back: 0.07 * 19.0 - 0.93,
        };
        let r = s.to_record();
        assert_eq!(r.name, "Rory");
        assert!((r.model_pct - 7.0).abs() < 1e-9);
        assert!((r.market_pct - 5.0).abs() < 1e-9);
        assert!((r.edge - 2.0).abs() < 1e-9);
        assert_eq!(r.live_odds, 20.0);
    }

    #[test]
    fn test_score_result_display_line() {
        let s = ScoreResult {
            name: "Tiger".into(),
            score: 55.0,
            p_model: 0.1,
            p_sim: 0.15,
            p_final: 0.12,
            p_implied: 0.125,
            edge: -0.005,
            fair_model: 1.0 / 0.12,
            fair_blend: 8.23,
            live_odds: 8.0,
            ev_back: -0.04,
        };
        let line = s.to_string();
        assert!(line.starts_with("Tiger  |  Score:  55.00  Model:  12.00%  Market:  12.50%"));
        assert!(line.contains("Edge: -0.50%"));
        assert!(line.contains("FairOdds:  8.23"));
        assert!(line.contains("LiveOdds: 8.00"));
        assert!(line.ends_with("EV: -0.040"));
    }

    // -- Signal / sizing tests --

    #[test]
    fn test_signal_display() {
        assert_eq!(Signal::Strong.to_string(), "Strong");
        assert_eq!(Signal::Weak.to_string(), "Weak");
        assert_eq!(Signal::ALL.len(), 3);
    }

    #[test]
    fn test_ranked_player_without_sizing() {
        let rp = RankedPlayer {
            record: PlayerRecord::new("A", 50.0, 5.0, 5.0, 20.0, 0.0),
            market_rank: 1,
            model_rank: 1,
            delta: 0,
            signal: None,
            sizing: None,
        };
        assert!(rp.stake().is_none());
        assert!(rp.liability().is_none());
    }

    // -- Bankroll tests --

    #[test]
    fn test_bankroll_parsing() {
        assert_eq!("1000".parse::<Bankroll>().unwrap().amount(), 1000.0);
        assert_eq!(" 250.5 ".parse::<Bankroll>().unwrap().amount(), 250.5);
        assert!("0".parse::<Bankroll>().is_err());
        assert!("-10".parse::<Bankroll>().is_err());
        assert!("lots".parse::<Bankroll>().is_err());
        assert!(Bankroll::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_bankroll_flag_wins_over_config() {
        let b = Bankroll::resolve(Some("250"), Some(1000.0)).unwrap();
        assert_eq!(b.amount(), 250.0);
    }

    #[test]
    fn test_bankroll_falls_back_to_config() {
        let b = Bankroll::resolve(None, Some(1000.0)).unwrap();
        assert_eq!(b.amount(), 1000.0);
    }

    #[test]
    fn test_bankroll_missing_everywhere_errors() {
        assert!(matches!(Bankroll::resolve(None, None), Err(ApexError::MissingBankroll)));
    }

    #[test]
    fn test_bankroll_invalid_flag_not_masked_by_config() {
        let result = Bankroll::resolve(Some("lots"), Some(1000.0));
        assert!(matches!(result, Err(ApexError::InvalidBankroll(_))));
        assert!(matches!(Bankroll::resolve(None, Some(-5.0)), Err(ApexError::InvalidBankroll(_))));
    }

    // -- Skipped input tests --

    #[test]
    fn test_skipped_labels() {
        assert_eq!(Skipped::line(3, "missing EV").to_string(), "Skipped line 3: missing EV");
        assert_eq!(
            Skipped::player("Tiger", "Invalid holes_left: 80 exceeds 72").to_string(),
            "Skipped player Tiger: Invalid holes_left: 80 exceeds 72"
        );
    }
}
