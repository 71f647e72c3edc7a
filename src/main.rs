//! ODDS APEX — golf win-probability model and lay staking
//!
//! Entry point. Loads configuration, initialises structured logging, and
//! dispatches one of three batch commands: score players, plan lays from
//! pasted model output, or do both in one pass.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use odds_apex::config::AppConfig;
use odds_apex::model::ScoringModel;
use odds_apex::parser;
use odds_apex::report::FieldReport;
use odds_apex::strategy::LayPlanner;
use odds_apex::types::{Bankroll, Skipped};

const DEFAULT_CONFIG: &str = "config.toml";

#[derive(Parser, Debug)]
#[command(name = "odds-apex", version, about = "Golf win-probability model and lay staking")]
struct Cli {
    /// Path to the TOML configuration file [default: config.toml, optional].
    #[arg(long, global = true, env = "ODDS_APEX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score players from a TOML file of [[player]] tables.
    Score {
        players: PathBuf,
        /// Fixed simulation seed (overrides config).
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Rank pasted model output and size lays.
    Lays {
        /// Batch text file; reads stdin when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        bankroll: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Score players and plan lays in one pass.
    Field {
        players: PathBuf,
        #[arg(long)]
        bankroll: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let cli = Cli::parse();
    let cfg = AppConfig::resolve(cli.config.as_deref(), Path::new(DEFAULT_CONFIG))?;

    match cli.command {
        Commands::Score { players, seed } => run_score(&cfg, &players, seed),
        Commands::Lays { input, bankroll, json } => run_lays(&cfg, input.as_deref(), bankroll, json),
        Commands::Field {
            players,
            bankroll,
            seed,
            json,
        } => run_field(&cfg, &players, bankroll, seed, json),
    }
}

/// Score each player and print one line per player.
fn run_score(cfg: &AppConfig, path: &Path, seed: Option<u64>) -> Result<()> {
    let players = parser::load_players(&path.to_string_lossy())?;
    let model = ScoringModel::new(cfg);
    let mut rng = make_rng(seed.or(cfg.simulation.seed));

    let mut failed = 0;
    for (name, result) in model.score_all(&players, &mut rng) {
        match result {
            Ok(score) => println!("{score}"),
            Err(e) => {
                error!(player = %name, error = %e, "Scoring aborted");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} players could not be scored", players.len());
    }
    Ok(())
}

/// Parse batch text, rank, classify, size, and print the report.
fn run_lays(cfg: &AppConfig, input: Option<&Path>, bankroll: Option<String>, json: bool) -> Result<()> {
    let bankroll = Bankroll::resolve(bankroll.as_deref(), cfg.staking.bankroll)?;

    let text = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch input: {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?,
    };

    let batch = parser::parse_batch(&text);
    info!(
        records = batch.records.len(),
        skipped = batch.skipped.len(),
        "Batch parsed"
    );

    let plan = LayPlanner::from_config(cfg).plan(&batch.records, bankroll);
    print_report(&FieldReport::new(bankroll, plan, batch.skipped), json)
}

/// Score a player file and feed the results straight into lay planning.
fn run_field(
    cfg: &AppConfig,
    path: &Path,
    bankroll: Option<String>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let bankroll = Bankroll::resolve(bankroll.as_deref(), cfg.staking.bankroll)?;
    let players = parser::load_players(&path.to_string_lossy())?;
    let model = ScoringModel::new(cfg);
    let mut rng = make_rng(seed.or(cfg.simulation.seed));

    let mut records = Vec::with_capacity(players.len());
    let mut skipped = Vec::new();
    for (name, result) in model.score_all(&players, &mut rng) {
        match result {
            Ok(score) => records.push(score.to_record()),
            Err(e) => {
                error!(player = %name, error = %e, "Scoring aborted");
                skipped.push(Skipped::player(name, e.to_string()));
            }
        }
    }

    let plan = LayPlanner::from_config(cfg).plan(&records, bankroll);
    print_report(&FieldReport::new(bankroll, plan, skipped), json)
}

fn print_report(report: &FieldReport, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_table());
    }
    info!(
        rows = report.rows.len(),
        skipped = report.skipped.len(),
        liability = format!("{:.2}", report.total_liability()),
        "Report written"
    );
    Ok(())
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => {
            info!(seed = s, "Seeded simulation");
            StdRng::seed_from_u64(s)
        }
        None => StdRng::from_entropy(),
    }
}

/// Initialise the `tracing` subscriber on stderr.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("odds_apex=info"));

    let json_logging = std::env::var("ODDS_APEX_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
