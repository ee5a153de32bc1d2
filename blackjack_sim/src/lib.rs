pub mod config;
pub mod stats;
pub mod write;

use blackjack_lib::prelude::*;
pub use config::{BlackjackSimulatorConfig, BlackjackSimulatorConfigBuilder};
pub use stats::BlackjackStats;
use std::collections::HashSet;
use std::fmt::Display;
use std::io::Write;
use std::sync::mpsc;
use std::thread;
use thiserror::Error;
use tracing::{debug, info};
pub use write::RoundRecordWriter;

pub mod prelude {
    pub use super::{
        BlackjackSimulation, BlackjackSimulator, BlackjackSimulatorConfig,
        BlackjackSimulatorConfigBuilder, BlackjackStats, MulStrategyBlackjackSimulator,
        MulStrategyBlackjackSimulatorBuilder, RoundRecordWriter, SimulationError,
        SimulationSummary,
    };
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("game error: {0}")]
    Game(#[from] BlackjackGameError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not parse configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("sending error: {0}")]
    Sending(String),
    #[error("simulation thread failed: {0}")]
    Thread(String),
}

/// Simple struct for recording all of the interesting data points accumulated during a simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub label: String,
    pub stats: BlackjackStats,
}

impl Display for SimulationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "strategy: {}", self.label)?;
        write!(f, "{}", self.stats)
    }
}

pub trait BlackjackSimulation: Send {
    /// Required method, plays every configured round.
    fn run(&mut self) -> Result<(), SimulationError>;
    /// Required method, the method for producing output statistics/data recorded during the simulation
    fn summary(&self) -> SimulationSummary;
}

/// Struct for running many rounds of blackjack at one table with a specific strategy, recording the
/// statistics of every round along the way.
pub struct BlackjackSimulator<S>
where
    S: Strategy,
{
    table: BlackjackTable<S>,
    total_rounds: u32,
    update_interval: u32,
    stats: BlackjackStats,
}

impl<S: Strategy> BlackjackSimulator<S> {
    /// Builds the table described by `config`. The shoe is seeded when `config.seed` is set.
    pub fn new(config: &BlackjackSimulatorConfig, strategy: S) -> Self {
        let table = match config.seed {
            Some(seed) => BlackjackTable::with_seed(config.table_config(), strategy, seed),
            None => BlackjackTable::new(config.table_config(), strategy),
        };
        BlackjackSimulator {
            table,
            total_rounds: config.total_rounds,
            update_interval: config.update_interval,
            stats: BlackjackStats::new(),
        }
    }

    /// Plays every round, handing each result to `on_round` after it is recorded. Stops at the first
    /// error, whether from the table or from `on_round`.
    pub fn run_with<F>(&mut self, mut on_round: F) -> Result<(), SimulationError>
    where
        F: FnMut(&RoundResult) -> Result<(), SimulationError>,
    {
        info!(
            strategy = %self.table.label(),
            rounds = self.total_rounds,
            decks = self.table.config().num_decks,
            "starting simulation"
        );
        for _ in 0..self.total_rounds {
            let result = self.table.play_round()?;
            self.stats.record_round(&result);
            on_round(&result)?;

            let played = self.table.rounds_played();
            if self.update_interval > 0 && played % self.update_interval == 0 {
                info!(
                    rounds = played,
                    shuffles = self.table.shoe().shuffles(),
                    winnings = self.stats.total_winnings,
                    wagered = self.stats.total_wagered,
                    "progress"
                );
            }
        }
        debug!(strategy = %self.table.label(), "simulation finished");
        Ok(())
    }

    pub fn stats(&self) -> &BlackjackStats {
        &self.stats
    }

    pub fn table(&self) -> &BlackjackTable<S> {
        &self.table
    }
}

impl<S: Strategy + Send> BlackjackSimulation for BlackjackSimulator<S> {
    fn run(&mut self) -> Result<(), SimulationError> {
        self.run_with(|_| Ok(()))
    }

    /// Method to get a `SimulationSummary` object derived from the current data recorded in `self`.
    fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            label: self.table.label(),
            stats: self.stats.clone(),
        }
    }
}

/// This struct is for running several simulations at once, e.g. different strategies or independent
/// batches of the same one. Each simulation runs in its own thread.
pub struct MulStrategyBlackjackSimulator {
    simulations: Vec<Box<dyn BlackjackSimulation>>,
    pub config: BlackjackSimulatorConfig,
}

impl MulStrategyBlackjackSimulator {
    /// Method that returns a new `MulStrategyBlackjackSimulatorBuilder` object.
    pub fn new(config: BlackjackSimulatorConfig) -> MulStrategyBlackjackSimulatorBuilder {
        MulStrategyBlackjackSimulatorBuilder {
            simulations: None,
            config,
        }
    }

    /// `config.batches` independent simulations of the strategy `config` describes.
    pub fn batches(config: BlackjackSimulatorConfig) -> MulStrategyBlackjackSimulator {
        let mut builder = MulStrategyBlackjackSimulator::new(config.clone());
        for _ in 0..config.batches {
            builder.simulation(config.strategy());
        }
        builder.build()
    }

    pub fn len(&self) -> usize {
        self.simulations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    /// Runs every simulation in a new thread. Each summary gets sent to a writer thread, which writes
    /// all of them to `file_out` once every simulation has finished.
    pub fn run(&mut self, file_out: Box<dyn Write + Send + 'static>) -> Result<(), SimulationError> {
        let (write_sender, write_receiver) = mpsc::channel::<(Option<SimulationSummary>, usize)>();

        let ids = (1..=self.simulations.len()).collect::<HashSet<usize>>();
        let write_handle =
            thread::spawn(move || write::write_summaries(write_receiver, ids, file_out));

        let mut handles = vec![];
        for (i, mut simulation) in self.simulations.drain(..).enumerate() {
            let id = i + 1;
            let sender = write_sender.clone();
            let handle = thread::spawn(move || -> Result<(), SimulationError> {
                simulation.run()?;
                sender
                    .send((Some(simulation.summary()), id))
                    .map_err(|e| SimulationError::Sending(e.to_string()))?;
                // Tell the writer we are finished with this simulation
                sender
                    .send((None, id))
                    .map_err(|e| SimulationError::Sending(e.to_string()))
            });
            handles.push((id, handle));
        }
        // The writer sees a closed channel if a simulation fails before signing off
        drop(write_sender);

        for (id, handle) in handles {
            handle
                .join()
                .map_err(|_| SimulationError::Thread(format!("simulation #{} panicked", id)))?
                .map_err(|e| {
                    tracing::error!(simulation = id, error = %e, "simulation failed");
                    e
                })?;
        }

        write_handle
            .join()
            .map_err(|_| SimulationError::Thread("summary writer panicked".to_string()))?
    }
}

/// Struct for building a `MulStrategyBlackjackSimulator` object
pub struct MulStrategyBlackjackSimulatorBuilder {
    simulations: Option<Vec<Box<dyn BlackjackSimulation>>>,
    config: BlackjackSimulatorConfig,
}

impl MulStrategyBlackjackSimulatorBuilder {
    /// Method for adding a new simulation, the only required input is a struct that implements the
    /// `Strategy` trait. Everything else is taken from the `BlackjackSimulatorConfig` passed during object
    /// creation. With a seed configured, the n-th simulation added is seeded with `seed + n`.
    pub fn simulation<S: Strategy + Send + 'static>(&mut self, strategy: S) -> &mut Self {
        let sim_vec = self.simulations.get_or_insert_with(Vec::new);
        let mut config = self.config.clone();
        config.seed = config.seed.map(|seed| seed.wrapping_add(sim_vec.len() as u64));
        sim_vec.push(Box::new(BlackjackSimulator::new(&config, strategy)));
        self
    }

    /// Method that builds a `MulStrategyBlackjackSimulator` object
    pub fn build(&mut self) -> MulStrategyBlackjackSimulator {
        MulStrategyBlackjackSimulator {
            simulations: self.simulations.take().unwrap_or_default(),
            config: self.config.clone(),
        }
    }
}
