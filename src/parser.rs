//! Input boundary: batch text, bankroll, and player files.
//!
//! Batch grammar, one player per line:
//!
//! ```text
//! Name | Score:<num> Model:<num>[%] Market:<num>[%] LiveOdds:<num> EV:<num>
//! ```
//!
//! Keys may appear in any order, the colon is optional, whitespace may
//! separate key and value, and `Score`/`EV` accept a leading sign. Any text
//! between the pairs is ignored, so a scored player line
//! (see `ScoreResult`'s `Display`) is itself valid input.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use tracing::{debug, warn};

use crate::types::{ApexError, Bankroll, PlayerFeatures, PlayerRecord, Skipped};

/// Result of parsing a batch: good records plus everything dropped.
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub records: Vec<PlayerRecord>,
    pub skipped: Vec<Skipped>,
}

/// How a key's value may be written.
#[derive(Clone, Copy)]
struct KeySpec {
    key: &'static str,
    signed: bool,
}

const SCORE: KeySpec = KeySpec { key: "Score", signed: true };
const MODEL: KeySpec = KeySpec { key: "Model", signed: false };
const MARKET: KeySpec = KeySpec { key: "Market", signed: false };
const LIVE_ODDS: KeySpec = KeySpec { key: "LiveOdds", signed: false };
const EV: KeySpec = KeySpec { key: "EV", signed: true };

/// Parse a whole batch. Lines without a `|` are not player lines and are
/// ignored silently; player lines that fail are reported in `skipped`.
pub fn parse_batch(text: &str) -> ParsedBatch {
    let mut batch = ParsedBatch::default();

    for (idx, line) in text.lines().enumerate() {
        if !line.contains('|') {
            continue;
        }
        match parse_line(line, idx + 1) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                debug!(error = %e, "Batch line skipped");
                let reason = match e {
                    ApexError::MalformedLine { reason, .. } => reason,
                    other => other.to_string(),
                };
                batch.skipped.push(Skipped::line(idx + 1, reason));
            }
        }
    }

    if !batch.skipped.is_empty() {
        warn!(
            parsed = batch.records.len(),
            skipped = batch.skipped.len(),
            "Some batch lines were skipped"
        );
    }

    batch
}

/// Parse one `Name | key:value ...` line.
pub fn parse_line(line: &str, line_no: usize) -> Result<PlayerRecord, ApexError> {
    let malformed = |reason: String| ApexError::MalformedLine { line: line_no, reason };

    let (name, stats) = line
        .split_once('|')
        .ok_or_else(|| malformed("missing '|' separator".into()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed("missing player name".into()));
    }

    let mut values = [0.0; 5];
    let mut missing = Vec::new();
    for (slot, spec) in [SCORE, MODEL, MARKET, LIVE_ODDS, EV].iter().enumerate() {
        match find_value(stats, spec) {
            Some(v) => values[slot] = v,
            None => missing.push(spec.key),
        }
    }
    if !missing.is_empty() {
        return Err(malformed(format!("missing {}", missing.join(", "))));
    }

    let [score, model_pct, market_pct, live_odds, ev] = values;
    if live_odds <= 1.0 {
        return Err(malformed(format!("LiveOdds {live_odds} must be greater than 1.0")));
    }

    Ok(PlayerRecord::new(name, score, model_pct, market_pct, live_odds, ev))
}

/// First well-formed value for `spec.key` in `stats`.
///
/// The key must not be the tail of a longer word (`xEV` is not `EV`).
fn find_value(stats: &str, spec: &KeySpec) -> Option<f64> {
    let mut from = 0;
    while let Some(pos) = stats[from..].find(spec.key) {
        let start = from + pos;
        from = start + spec.key.len();

        let preceded_by_word = stats[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric());
        if preceded_by_word {
            continue;
        }
        if let Some(v) = read_number(&stats[from..], spec) {
            return Some(v);
        }
    }
    None
}

/// Read `[:]\s*[sign]digits[.digits]` at the start of `rest`.
fn read_number(rest: &str, spec: &KeySpec) -> Option<f64> {
    let rest = rest.strip_prefix(':').unwrap_or(rest).trim_start();
    let bytes = rest.as_bytes();
    let mut end = 0;

    if spec.signed && matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == int_start {
        return None;
    }
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    // A trailing '%' (Model/Market) is left unread.
    rest[..end].parse().ok()
}

/// Parse bankroll text. Non-numeric or non-positive input is an error.
pub fn parse_bankroll(text: &str) -> Result<Bankroll, ApexError> {
    text.parse()
}

/// A file of `[[player]]` tables.
#[derive(Debug, Deserialize)]
struct PlayerFile {
    #[serde(default, rename = "player")]
    players: Vec<PlayerFeatures>,
}

/// Load player features from a TOML file of `[[player]]` tables.
pub fn load_players(path: &str) -> Result<Vec<PlayerFeatures>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read player file: {path}"))?;
    parse_players(&contents).with_context(|| format!("Failed to parse player file: {path}"))
}

/// Parse `[[player]]` tables from TOML text.
pub fn parse_players(contents: &str) -> Result<Vec<PlayerFeatures>> {
    let file: PlayerFile = toml::from_str(contents)?;
    Ok(file.players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
