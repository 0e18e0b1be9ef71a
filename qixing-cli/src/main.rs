mod display;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use qixing_data::source::default_data_path;
use qixing_data::{CsvSource, DrawSource, Position};
use qixing_engine::selector::DEFAULT_COMBINATIONS;
use qixing_engine::{DrawHistory, DrawSummary, Predictor, ScoringWeights, compute_features};

use crate::display::{
    display_correlation, display_features, display_history, display_prediction, display_summary,
};

#[derive(Parser)]
#[command(name = "qixing", about = "Seven-position draw history statistics")]
struct Cli {
    /// CSV export of the draw history
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank candidate digits per position and sample combinations
    Predict {
        /// Number of combinations
        #[arg(short, long, default_value_t = DEFAULT_COMBINATIONS)]
        count: usize,

        /// Seed for reproducible combinations
        #[arg(long)]
        seed: Option<u64>,

        /// JSON file overriding the scoring weights
        #[arg(short, long)]
        weights: Option<PathBuf>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Show the feature sets per position
    Features {
        /// Single position (1-7)
        #[arg(short, long)]
        position: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Show conditional tables between adjacent positions
    Correlations {
        /// Left position of the pair (1-6)
        #[arg(short, long)]
        pair: Option<usize>,
    },

    /// Summarize the newest draw
    Latest,

    /// List the newest draws
    History {
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Write the default scoring weights as JSON
    Weights {
        #[arg(short, long, default_value = "weights.json")]
        output: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "qixing=debug" } else { "qixing=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let path = cli.file.unwrap_or_else(default_data_path);

    match cli.command {
        Command::Predict { count, seed, weights, json } => cmd_predict(&path, count, seed, weights.as_deref(), json),
        Command::Features { position, json } => cmd_features(&path, position, json),
        Command::Correlations { pair } => cmd_correlations(&path, pair),
        Command::Latest => cmd_latest(&path),
        Command::History { last } => cmd_history(&path, last),
        Command::Weights { output } => cmd_weights(&output),
    }
}

fn load_history(path: &Path) -> Result<DrawHistory> {
    let source = CsvSource::new(path);
    let raw = source.load()?;
    let history = DrawHistory::from_raw(&raw)
        .with_context(|| format!("Unable to load history from {:?}", source.path()))?;
    tracing::info!(draws = history.len(), "history loaded");
    Ok(history)
}

fn parse_position(number: usize) -> Result<Position> {
    Position::new(number).with_context(|| format!("Position out of range (1-7): {}", number))
}

fn cmd_predict(path: &Path, count: usize, seed: Option<u64>, weights: Option<&Path>, json: bool) -> Result<()> {
    let history = load_history(path)?;
    if history.is_empty() {
        bail!("Empty history in {:?}", path);
    }

    let weights = match weights {
        Some(p) => ScoringWeights::load(p)?,
        None => ScoringWeights::default(),
    };
    let predictor = Predictor::new(weights, Default::default());
    let prediction = predictor.predict(&history, count, seed)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
    } else {
        display_prediction(&prediction);
    }
    Ok(())
}

fn cmd_features(path: &Path, position: Option<usize>, json: bool) -> Result<()> {
    let history = load_history(path)?;
    let snapshot = compute_features(&history);
    let positions = match position {
        Some(n) => vec![parse_position(n)?],
        None => Position::ALL.to_vec(),
    };

    if json {
        let sets: Vec<_> = positions.iter().map(|&p| snapshot.position(p)).collect();
        println!("{}", serde_json::to_string_pretty(&sets)?);
        return Ok(());
    }
    for p in positions {
        display_features(snapshot.position(p));
    }
    Ok(())
}

fn cmd_correlations(path: &Path, pair: Option<usize>) -> Result<()> {
    let history = load_history(path)?;
    let snapshot = compute_features(&history);
    match pair {
        Some(n) => {
            let from = parse_position(n)?;
            let table = snapshot
                .correlation(from)
                .with_context(|| format!("No pair starts at {}", from))?;
            display_correlation(table);
        }
        None => snapshot.correlations.iter().for_each(display_correlation),
    }
    Ok(())
}

fn cmd_latest(path: &Path) -> Result<()> {
    let history = load_history(path)?;
    let Some(latest) = history.latest() else {
        println!("Empty history.");
        return Ok(());
    };
    display_summary(latest, &DrawSummary::of(latest));
    Ok(())
}

fn cmd_history(path: &Path, last: usize) -> Result<()> {
    let history = load_history(path)?;
    let shown = last.min(history.len());
    display_history(&history.records()[..shown]);
    Ok(())
}

fn cmd_weights(output: &Path) -> Result<()> {
    ScoringWeights::default().save(output)?;
    println!("Default weights written to {}", output.display());
    Ok(())
}
