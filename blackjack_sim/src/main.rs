use blackjack_sim::prelude::*;
use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Plays many rounds of six deck blackjack with basic strategy and reports the results.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON configuration file, flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of rounds to play
    #[arg(short, long)]
    rounds: Option<u32>,

    /// Number of decks in the shoe
    #[arg(short, long)]
    decks: Option<usize>,

    /// Fraction of the shoe left when it gets reshuffled
    #[arg(long)]
    reshuffle_threshold: Option<f64>,

    /// Bet placed on every starting hand
    #[arg(long)]
    bet_unit: Option<u32>,

    /// Rounds between progress reports
    #[arg(long)]
    update_interval: Option<u32>,

    /// Take insurance every time the dealer shows an ace
    #[arg(long)]
    insurance: bool,

    /// CSV file receiving a record of every round
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write one CSV row per round instead of one per hand
    #[arg(long)]
    flat_csv: bool,

    /// Seed for a reproducible shoe
    #[arg(long)]
    seed: Option<u64>,

    /// Number of independent simulations to run in parallel
    #[arg(short, long)]
    batches: Option<u32>,

    /// Log every deal and decision
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<BlackjackSimulatorConfig, SimulationError> {
        let mut config = match &self.config {
            Some(path) => BlackjackSimulatorConfig::from_json_file(path)?,
            None => BlackjackSimulatorConfig::default(),
        };
        if let Some(rounds) = self.rounds {
            config.total_rounds = rounds;
        }
        if let Some(decks) = self.decks {
            config.num_decks = decks;
        }
        if let Some(threshold) = self.reshuffle_threshold {
            config.reshuffle_threshold = threshold;
        }
        if let Some(bet) = self.bet_unit {
            config.bet_unit = bet;
        }
        if let Some(interval) = self.update_interval {
            config.update_interval = interval;
        }
        if let Some(batches) = self.batches {
            config.batches = batches;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.insurance |= self.insurance;
        config.flat_csv |= self.flat_csv;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = args.into_config()?;

    if config.batches > 1 {
        if config.output.is_some() {
            warn!("round records are not written when running batches");
        }
        let mut simulator = MulStrategyBlackjackSimulator::batches(config);
        simulator.run(Box::new(io::stdout()))?;
        return Ok(());
    }

    let mut simulator = BlackjackSimulator::new(&config, config.strategy());
    match &config.output {
        Some(path) => {
            info!(path = %path.display(), flat = config.flat_csv, "writing round records");
            let file = BufWriter::new(File::create(path)?);
            let mut writer = RoundRecordWriter::new(file, config.flat_csv);
            simulator.run_with(|result| writer.write_round(result))?;
            writer.flush()?;
        }
        None => simulator.run()?,
    }
    println!("{}", simulator.summary());
    Ok(())
}
